use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days of transaction history requested by default
pub const DEFAULT_MAX_HISTORICAL_DAYS: u32 = 180;

/// Days the account access stays valid by default
pub const DEFAULT_ACCESS_VALID_FOR_DAYS: u32 = 90;

/// Body of `POST /agreements/enduser/`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgreementRequest {
    pub institution_id: String,
    pub max_historical_days: u32,
    pub access_valid_for_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_scope: Option<Vec<String>>,
}

impl AgreementRequest {
    pub fn new(institution_id: impl Into<String>) -> Self {
        Self {
            institution_id: institution_id.into(),
            max_historical_days: DEFAULT_MAX_HISTORICAL_DAYS,
            access_valid_for_days: DEFAULT_ACCESS_VALID_FOR_DAYS,
            access_scope: None,
        }
    }
}

/// End-user agreement as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Agreement {
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    pub max_historical_days: u32,
    pub access_valid_for_days: u32,
    pub access_scope: Vec<String>,
    pub accepted: Option<DateTime<Utc>>,
    pub institution_id: String,
}
