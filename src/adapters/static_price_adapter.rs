//! Static price snapshot adapter.
//!
//! Prices are fixed for the lifetime of the adapter. Live quotes are a
//! separate collaborator that only needs to implement [`PricePort`].

use std::collections::HashMap;

use crate::domain::config_validation::{parse_double, PRICES_SECTION};
use crate::domain::error::AtlasError;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticPriceAdapter {
    prices: HashMap<String, f64>,
}

impl StaticPriceAdapter {
    /// The built-in MVP quotes.
    pub fn mvp() -> Self {
        Self::default()
            .with_price("VTI", 230.50)
            .with_price("VXUS", 60.00)
            .with_price("BND", 75.00)
    }

    /// Uses the `[prices]` section when present, the built-in quotes otherwise.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AtlasError> {
        if !config.has_section(PRICES_SECTION) {
            return Ok(Self::mvp());
        }
        let mut adapter = Self::default();
        for (symbol, _) in config.entries(PRICES_SECTION) {
            if let Some(price) = parse_double(config, PRICES_SECTION, &symbol)? {
                adapter.prices.insert(symbol, price);
            }
        }
        Ok(adapter)
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }
}

impl PricePort for StaticPriceAdapter {
    fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn mvp_quotes() {
        let prices = StaticPriceAdapter::mvp();
        assert_eq!(prices.price("VTI"), Some(230.50));
        assert_eq!(prices.price("VXUS"), Some(60.00));
        assert_eq!(prices.price("BND"), Some(75.00));
        assert_eq!(prices.price("IVV"), None);
    }

    #[test]
    fn from_config_without_section_uses_mvp() {
        let config = FileConfigAdapter::from_string("[run]\ncash = 1\n").unwrap();
        assert_eq!(StaticPriceAdapter::from_config(&config).unwrap(), StaticPriceAdapter::mvp());
    }

    #[test]
    fn from_config_replaces_quotes() {
        let config = FileConfigAdapter::from_string("[prices]\nIVV = 461.0\nAGG = 98.25\n").unwrap();
        let prices = StaticPriceAdapter::from_config(&config).unwrap();
        assert_eq!(prices.price("IVV"), Some(461.0));
        assert_eq!(prices.price("AGG"), Some(98.25));
        assert_eq!(prices.price("VTI"), None);
    }

    #[test]
    fn from_config_rejects_garbage() {
        let config = FileConfigAdapter::from_string("[prices]\nVTI = cheap\n").unwrap();
        let err = StaticPriceAdapter::from_config(&config).unwrap_err();
        assert!(matches!(err, AtlasError::ConfigInvalid { key, .. } if key == "VTI"));
    }
}
