//! Recommendation records produced by the engines.

use std::fmt;

use serde::Serialize;

use super::asset_class::AssetClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.write_str("BUY"),
            Action::Sell => f.write_str("SELL"),
        }
    }
}

/// Which engine produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    TaxLossHarvest,
    Rebalance,
}

/// One hypothetical trade. Dollar figures are carried as typed fields; the
/// `reason` text is for humans only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub action: Action,
    pub symbol: String,
    pub quantity: f64,
    /// Dollar value of the trade at the price used to size it. Unrounded.
    pub notional: f64,
    pub reason: String,
    pub strategy: Strategy,
    /// Absolute realized loss, present on harvest sells only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvested_loss: Option<f64>,
    /// Present on harvest sells only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_tax_savings: Option<f64>,
}

impl Recommendation {
    /// Sell a whole losing lot. `loss` is the absolute loss amount.
    pub fn harvest_sell(
        symbol: &str,
        quantity: f64,
        proceeds: f64,
        loss: f64,
        tax_savings: f64,
    ) -> Self {
        Recommendation {
            action: Action::Sell,
            symbol: symbol.to_string(),
            quantity,
            notional: proceeds,
            reason: format!("Harvest a {} loss.", format_dollars(loss)),
            strategy: Strategy::TaxLossHarvest,
            harvested_loss: Some(loss),
            estimated_tax_savings: Some(tax_savings),
        }
    }

    pub fn replacement_buy(symbol: &str, quantity: f64, amount: f64, replaces: &str) -> Self {
        Recommendation {
            action: Action::Buy,
            symbol: symbol.to_string(),
            quantity: round_to_cents(quantity),
            notional: amount,
            reason: format!("Replacement for {replaces} to maintain market exposure."),
            strategy: Strategy::TaxLossHarvest,
            harvested_loss: None,
            estimated_tax_savings: None,
        }
    }

    pub fn rebalance_buy(
        symbol: &str,
        quantity: f64,
        amount: f64,
        class: AssetClass,
        target_fraction: f64,
    ) -> Self {
        Recommendation {
            action: Action::Buy,
            symbol: symbol.to_string(),
            quantity: round_to_cents(quantity),
            notional: amount,
            reason: format!(
                "Rebalance to target {}% in {class}.",
                round_to_cents(target_fraction * 100.0)
            ),
            strategy: Strategy::Rebalance,
            harvested_loss: None,
            estimated_tax_savings: None,
        }
    }
}

/// Rounds to two decimal places. Only applied to values that are final
/// outputs, never to intermediates of a dollar calculation. Ties round to
/// even.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn format_dollars(amount: f64) -> String {
    format!("${amount:.2}")
}
