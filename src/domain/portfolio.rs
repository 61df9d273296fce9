//! Portfolio state at one instant.

use serde::Serialize;

use super::error::AtlasError;
use super::holding::Holding;
use crate::ports::holdings_port::HoldingsPort;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub cash: f64,
    /// Lots in ingestion order. Several lots of one symbol are allowed.
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(cash: f64, holdings: Vec<Holding>) -> Result<Self, AtlasError> {
        if !cash.is_finite() || cash < 0.0 {
            return Err(AtlasError::config_invalid(
                "run",
                "cash",
                format!("cash must be a non-negative number, got {cash}"),
            ));
        }
        Ok(Portfolio { cash, holdings })
    }

    pub fn cash_only(cash: f64) -> Result<Self, AtlasError> {
        Self::new(cash, Vec::new())
    }

    /// Builds the run's portfolio from an ingestion source and a cash balance.
    pub fn load(source: &dyn HoldingsPort, cash: f64) -> Result<Self, AtlasError> {
        Self::new(cash, source.load_holdings()?)
    }

    /// Market value of one lot, zero when no tradable price is available.
    pub fn holding_value(holding: &Holding, prices: &dyn PricePort) -> f64 {
        holding.market_value(prices.tradable_price(&holding.symbol).unwrap_or(0.0))
    }

    /// Cash plus the market value of every lot. Lots without a tradable price
    /// contribute nothing.
    pub fn total_value(&self, prices: &dyn PricePort) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .map(|h| Self::holding_value(h, prices))
            .sum();
        self.cash + holdings_value
    }
}
