use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub base_currency: String,
    pub display_currency: String,
    /// Units of each currency per one unit of the base currency
    pub rates: HashMap<String, f64>,
}

/// Request to update currency settings
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateCurrencyRequest {
    pub display_currency: Option<String>,
    pub rates: Option<HashMap<String, f64>>,
}
