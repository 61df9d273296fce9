//! A single tax lot of a security.

use serde::Serialize;

use super::error::AtlasError;

/// One tax lot. Market value is never stored; it is derived from a price
/// supplied at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub cost_basis_per_share: f64,
}

impl Holding {
    /// Builds a lot, rejecting an empty symbol and negative or non-finite
    /// numbers. A zero quantity is allowed.
    pub fn new(
        symbol: impl Into<String>,
        quantity: f64,
        cost_basis_per_share: f64,
    ) -> Result<Self, AtlasError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(AtlasError::InvalidHolding {
                symbol,
                reason: "symbol must not be empty".into(),
            });
        }
        check_amount(&symbol, "quantity", quantity)?;
        check_amount(&symbol, "cost_basis_per_share", cost_basis_per_share)?;
        Ok(Holding {
            symbol,
            quantity,
            cost_basis_per_share,
        })
    }

    pub fn cost_basis(&self) -> f64 {
        self.quantity * self.cost_basis_per_share
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    /// Paper profit (positive) or loss (negative) if sold at `price`.
    pub fn unrealized_gain_loss(&self, price: f64) -> f64 {
        (price - self.cost_basis_per_share) * self.quantity
    }
}

fn check_amount(symbol: &str, field: &str, value: f64) -> Result<(), AtlasError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AtlasError::InvalidHolding {
            symbol: symbol.to_string(),
            reason: format!("{field} must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}
