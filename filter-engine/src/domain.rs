use serde::{Deserialize, Serialize};

/// Field names and fixed conditions of the filtered entity.
///
/// The defaults describe FX saving-wallet transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDomainConfig {
    pub type_field: String,
    /// Amount in the currency of the filtered rows
    pub amount_field: String,
    /// Amount already expressed in the ledger's base currency
    pub base_amount_field: String,
    pub date_field: String,
    pub currency_field: String,
    /// Currency condition added next to every amount range; `None` or an
    /// empty code omits it
    pub fixed_currency: Option<String>,
}

impl Default for FilterDomainConfig {
    fn default() -> Self {
        Self {
            type_field: "type".to_string(),
            amount_field: "amount".to_string(),
            base_amount_field: "baseAmount".to_string(),
            date_field: "date".to_string(),
            currency_field: "currency".to_string(),
            fixed_currency: Some("FX".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FilterDomainConfig =
            serde_json::from_str(r#"{"fixed_currency": null, "date_field": "createdAt"}"#)
                .unwrap();

        assert_eq!(config.fixed_currency, None);
        assert_eq!(config.date_field, "createdAt");
        assert_eq!(config.amount_field, "amount");
        assert_eq!(config.base_amount_field, "baseAmount");
    }
}
