//! Tax-loss harvesting engine.
//!
//! Finds lots trading below cost basis and pairs a full-lot SELL with a BUY
//! of the configured replacement symbol, so market exposure is kept without
//! repurchasing the identical security.

use std::collections::BTreeMap;

use tracing::debug;

use super::holding::Holding;
use super::policy::Policy;
use super::portfolio::Portfolio;
use super::recommendation::Recommendation;
use crate::ports::price_port::PricePort;

/// A lot with an unrealized loss at the current price.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestableLot<'a> {
    pub holding: &'a Holding,
    pub current_price: f64,
    /// Always strictly negative.
    pub unrealized_gain_loss: f64,
}

/// Result of one harvesting run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarvestOutcome {
    pub recommendations: Vec<Recommendation>,
    /// Placeholder quotes synthesized for replacement symbols the oracle
    /// could not price. Scoped to this run; the oracle is never written to.
    pub synthesized_prices: BTreeMap<String, f64>,
}

/// Lots with a strictly negative unrealized gain/loss, in holdings order.
/// Lots without a tradable current price are skipped.
pub fn find_harvestable_losses<'a>(
    portfolio: &'a Portfolio,
    prices: &dyn PricePort,
) -> Vec<HarvestableLot<'a>> {
    portfolio
        .holdings
        .iter()
        .filter_map(|holding| {
            let Some(current_price) = prices.tradable_price(&holding.symbol) else {
                debug!(symbol = %holding.symbol, "no price, lot skipped for harvesting");
                return None;
            };
            let unrealized_gain_loss = holding.unrealized_gain_loss(current_price);
            (unrealized_gain_loss < 0.0).then_some(HarvestableLot {
                holding,
                current_price,
                unrealized_gain_loss,
            })
        })
        .collect()
}

/// Runs the harvesting scan and returns the SELL/BUY pairs together with any
/// replacement prices synthesized along the way.
pub fn harvest(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    tax_rate: f64,
) -> HarvestOutcome {
    let mut outcome = HarvestOutcome::default();

    for lot in find_harvestable_losses(portfolio, prices) {
        let holding = lot.holding;
        let loss = lot.unrealized_gain_loss.abs();
        let tax_savings = loss * tax_rate;

        let Some(replacement) = policy.replacement_for(&holding.symbol) else {
            debug!(symbol = %holding.symbol, loss, "no replacement configured, lot not harvested");
            continue;
        };

        let proceeds = holding.quantity * lot.current_price;
        let replacement_price = match prices.tradable_price(replacement) {
            Some(price) => price,
            None => *outcome
                .synthesized_prices
                .entry(replacement.to_string())
                .or_insert(lot.current_price * policy.replacement_markup),
        };
        let replacement_quantity = proceeds / replacement_price;

        debug!(
            symbol = %holding.symbol,
            replacement,
            loss,
            tax_savings,
            replacement_price,
            "harvesting lot"
        );

        outcome.recommendations.push(Recommendation::harvest_sell(
            &holding.symbol,
            holding.quantity,
            proceeds,
            loss,
            tax_savings,
        ));
        outcome.recommendations.push(Recommendation::replacement_buy(
            replacement,
            replacement_quantity,
            proceeds,
            &holding.symbol,
        ));
    }

    outcome
}

/// SELL/BUY pairs for every harvestable lot with a configured replacement.
/// Each SELL is immediately followed by its BUY.
pub fn generate_tlh_recommendations(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    tax_rate: f64,
) -> Vec<Recommendation> {
    harvest(portfolio, prices, policy, tax_rate).recommendations
}
