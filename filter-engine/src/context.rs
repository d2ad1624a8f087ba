use crate::domain::FilterDomainConfig;
use shared_types::{ConversionError, CurrencyConverter};

/// Currency and domain settings shared by the builder and the extractor
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    /// Currency the user sees amounts in
    pub display_currency: &'a str,
    /// Currency the ledger stores amounts in
    pub base_currency: &'a str,
    pub converter: &'a dyn CurrencyConverter,
    pub domain: &'a FilterDomainConfig,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        display_currency: &'a str,
        base_currency: &'a str,
        converter: &'a dyn CurrencyConverter,
        domain: &'a FilterDomainConfig,
    ) -> Self {
        Self {
            display_currency,
            base_currency,
            converter,
            domain,
        }
    }

    pub fn to_base(&self, amount: f64) -> Result<f64, ConversionError> {
        self.converter
            .convert(amount, self.display_currency, self.base_currency)
    }

    pub fn to_display(&self, amount: f64) -> Result<f64, ConversionError> {
        self.converter
            .convert(amount, self.base_currency, self.display_currency)
    }
}

impl std::fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterContext")
            .field("display_currency", &self.display_currency)
            .field("base_currency", &self.base_currency)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
