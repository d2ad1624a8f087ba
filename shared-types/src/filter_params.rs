use crate::currency::ConversionError;
use crate::filter::{Comparator, FilterNode, Scalar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Date bounds selected in the filter panel. A range whose bounds are equal
/// is an exact-day filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn exact(at: DateTime<Utc>) -> Self {
        Self {
            from: Some(at),
            to: Some(at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn is_exact(&self) -> bool {
        self.from.is_some() && self.from == self.to
    }
}

/// Inclusive amount bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Filter panel state: what the user picked, in display currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct FilterParams {
    #[serde(default)]
    pub types: Vec<String>,
    pub amount_min: f64,
    pub amount_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// A single condition appended by a click-to-filter table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct FilterEdit {
    #[serde(default)]
    pub comparator: Comparator,
    pub target: String,
    #[ts(type = "string | number | boolean | null")]
    pub value: Scalar,
    #[serde(default)]
    pub sub_target: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
}

impl FilterEdit {
    pub fn new(target: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            comparator: Comparator::And,
            target: target.into(),
            value: value.into(),
            sub_target: None,
            operator: None,
        }
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_sub_target(mut self, sub_target: impl Into<String>) -> Self {
        self.sub_target = Some(sub_target.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
}

/// Filter engine error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid amount range: min {min} is greater than max {max}")]
    InvalidAmountRange { min: f64, max: f64 },

    #[error("Amount must be a finite number, got {0}")]
    NonFiniteAmount(f64),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Currency conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

/// Request to build a filter tree from panel state
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct BuildFilterRequest {
    pub params: FilterParams,
    pub display_currency: Option<String>,
}

/// Request to read panel state back out of a filter tree
#[derive(Debug, Default, Serialize, Deserialize, TS)]
pub struct ExtractFilterRequest {
    /// Falls back to the scope's current tree when absent
    #[ts(type = "Record<string, unknown> | null")]
    pub tree: Option<FilterNode>,
    pub display_currency: Option<String>,
    pub default_min: Option<f64>,
    pub default_max: Option<f64>,
}

/// Request to add one condition to the scope's current tree
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct EditFilterRequest {
    pub edit: FilterEdit,
    /// Replace an existing condition on the same target instead of appending
    #[serde(default)]
    pub replace: bool,
}

/// Request to overwrite the scope's current tree
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ReplaceFilterRequest {
    #[ts(type = "Record<string, unknown>")]
    pub tree: FilterNode,
}

/// Current filter state of one scope
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FilterStateResponse {
    pub scope: String,
    #[ts(type = "Record<string, unknown>")]
    pub tree: FilterNode,
    pub base_range: Option<AmountRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_filter_params_defaults() {
        let params: FilterParams =
            serde_json::from_value(json!({"amount_min": 0, "amount_max": 100})).unwrap();
        assert!(params.types.is_empty());
        assert_eq!(params.amount_max, 100.0);
        assert!(params.date_range.is_none());

        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("date_range").is_none());
    }

    #[test]
    fn test_exact_date_range() {
        let day = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert!(DateRange::exact(day).is_exact());
        assert!(!DateRange::new(Some(day), None).is_exact());
        assert!(DateRange::default().is_empty());
    }

    #[test]
    fn test_filter_edit_deserialization() {
        let edit: FilterEdit = serde_json::from_value(json!({
            "target": "wallet",
            "value": "Gold",
            "sub_target": "name"
        }))
        .unwrap();

        assert_eq!(edit.comparator, Comparator::And);
        assert_eq!(edit, FilterEdit::new("wallet", "Gold").with_sub_target("name"));
    }

    #[test]
    fn test_filter_error_messages() {
        let err = FilterError::InvalidAmountRange { min: 10.0, max: 1.0 };
        assert_eq!(
            err.to_string(),
            "Invalid amount range: min 10 is greater than max 1"
        );

        let err: FilterError = ConversionError::UnknownCurrency("XYZ".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Currency conversion failed: Unknown currency: XYZ"
        );
    }
}
