use serde::{Deserialize, Serialize};

/// Bank or card issuer reachable through the aggregator
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub bic: String,
    pub transaction_total_days: String,
    pub countries: Vec<String>,
    pub logo: String,
    pub identification_codes: Vec<String>,
    pub max_access_valid_for_days: String,
}
