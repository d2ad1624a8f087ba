use serde::{Deserialize, Serialize};
use shared_types::{ConversionError, CurrencyConverter};
use std::collections::HashMap;

/// Exchange rates relative to one base currency.
///
/// Each rate is the number of units of a currency worth one unit of the base
/// currency, e.g. `VND = 25000.0` with base `USD`. Codes are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base_currency: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base_currency: &str) -> Self {
        Self {
            base_currency: base_currency.to_ascii_uppercase(),
            rates: HashMap::new(),
        }
    }

    pub fn from_rates(
        base_currency: &str,
        rates: &HashMap<String, f64>,
    ) -> Result<Self, ConversionError> {
        rates
            .iter()
            .try_fold(Self::new(base_currency), |table, (currency, rate)| {
                table.with_rate(currency, *rate)
            })
    }

    pub fn with_rate(mut self, currency: &str, rate: f64) -> Result<Self, ConversionError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConversionError::InvalidRate {
                currency: currency.to_string(),
                rate,
            });
        }

        self.rates.insert(currency.to_ascii_uppercase(), rate);
        Ok(self)
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Units of `currency` per one unit of the base currency
    pub fn rate(&self, currency: &str) -> Result<f64, ConversionError> {
        let code = currency.to_ascii_uppercase();
        if code == self.base_currency {
            return Ok(1.0);
        }

        self.rates
            .get(&code)
            .copied()
            .ok_or(ConversionError::UnknownCurrency(code))
    }
}

impl CurrencyConverter for RateTable {
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(amount);
        }

        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        Ok(amount / from_rate * to_rate)
    }
}

/// Converter that leaves every amount unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl CurrencyConverter for IdentityConverter {
    fn convert(&self, amount: f64, _from: &str, _to: &str) -> Result<f64, ConversionError> {
        Ok(amount)
    }
}
