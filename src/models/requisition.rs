use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language of the bank-linking pages shown to the end user
pub const DEFAULT_USER_LANGUAGE: &str = "EN";

/// Status code of a requisition whose accounts have been linked
pub const STATUS_LINKED: &str = "LN";

/// Body of `POST /requisitions/`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequisitionRequest {
    pub redirect: String,
    pub institution_id: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement: Option<String>,
    pub user_language: String,
}

impl RequisitionRequest {
    /// Build a request with a fresh unique reference
    pub fn new(
        institution_id: impl Into<String>,
        agreement: Option<String>,
        redirect: impl Into<String>,
    ) -> Self {
        Self {
            redirect: redirect.into(),
            institution_id: institution_id.into(),
            reference: Uuid::new_v4().to_string(),
            agreement,
            user_language: DEFAULT_USER_LANGUAGE.to_string(),
        }
    }
}

/// Requisition as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Requisition {
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    pub redirect: String,
    pub status: String,
    pub institution_id: String,
    pub agreement: String,
    pub reference: String,
    pub accounts: Vec<String>,
    pub user_language: String,
    pub link: String,
    pub ssn: Option<String>,
    pub account_selection: bool,
    pub redirect_immediate: bool,
}

impl Requisition {
    /// Whether the end user finished linking and accounts are available
    pub fn is_linked(&self) -> bool {
        self.status == STATUS_LINKED
    }
}
