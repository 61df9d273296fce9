//! Price oracle port trait.

use std::collections::{BTreeMap, HashMap};

/// Current price lookup. `None` means no price is available for the symbol;
/// callers decide what that means for them, it is never an error.
pub trait PricePort {
    fn price(&self, symbol: &str) -> Option<f64>;

    /// A price usable as a divisor. Zero, negative and non-finite quotes are
    /// reported as missing.
    fn tradable_price(&self, symbol: &str) -> Option<f64> {
        self.price(symbol)
            .filter(|price| price.is_finite() && *price > 0.0)
    }
}

impl PricePort for HashMap<String, f64> {
    fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).copied()
    }
}

impl PricePort for BTreeMap<String, f64> {
    fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).copied()
    }
}
