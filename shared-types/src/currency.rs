/// Converts an amount between two currency codes.
///
/// Implementations are synchronous; rates that come from a remote source must
/// be resolved before a filter is built or read.
pub trait CurrencyConverter {
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError>;
}

impl<F> CurrencyConverter for F
where
    F: Fn(f64, &str, &str) -> Result<f64, ConversionError>,
{
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        self(amount, from, to)
    }
}

/// Currency conversion error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid rate {rate} for currency {currency}")]
    InvalidRate { currency: String, rate: f64 },
}
