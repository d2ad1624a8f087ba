use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod currency;
pub mod filter;
pub mod filter_params;
pub mod settings;

pub use currency::{ConversionError, CurrencyConverter};
pub use filter::{
    number_value, Comparator, Condition, FilterNode, FilterTree, RangeCondition, Scalar, AND_KEY,
    OR_KEY,
};
pub use filter_params::{
    AmountRange, BuildFilterRequest, DateRange, EditFilterRequest, ExtractFilterRequest,
    FilterEdit, FilterError, FilterParams, FilterStateResponse, ReplaceFilterRequest,
};
pub use settings::{SettingsResponse, UpdateCurrencyRequest};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}
