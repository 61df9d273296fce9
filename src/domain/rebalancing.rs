//! Target-allocation rebalancing engine.
//!
//! Measures the current asset-class allocation against a risk profile's
//! target and spends available cash on the most underweight classes first.
//! Overweight classes are reported by [`compute_drift`] but never sold.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::asset_class::{AssetClass, Bucket};
use super::policy::{Policy, TargetAllocation};
use super::portfolio::Portfolio;
use super::recommendation::Recommendation;
use crate::ports::price_port::PricePort;

pub const DEFAULT_DRIFT_THRESHOLD: f64 = 0.05;

/// Fraction of total value per bucket.
pub type Allocation = BTreeMap<Bucket, f64>;

/// Gap between target and current weight for one asset class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub asset_class: AssetClass,
    pub target: f64,
    pub current: f64,
    /// `target - current`; positive when underweight.
    pub drift: f64,
    /// Signed dollars needed to close the gap.
    pub dollar_amount: f64,
}

impl Drift {
    /// Strictly greater than: a drift equal to the threshold is tolerated.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.drift.abs() > threshold
    }

    pub fn is_underweight(&self) -> bool {
        self.dollar_amount > 0.0
    }
}

/// Current allocation by asset class plus a `CASH` bucket. Holdings without a
/// price count as zero; holdings without an asset class add to the total but
/// to no bucket. Returns an empty map when the portfolio is worth nothing.
pub fn calculate_current_allocation(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
) -> Allocation {
    let total_value = portfolio.total_value(prices);
    if total_value == 0.0 {
        return Allocation::new();
    }

    let mut values: BTreeMap<Bucket, f64> = BTreeMap::new();
    values.insert(Bucket::Cash, portfolio.cash);
    for holding in &portfolio.holdings {
        if let Some(class) = policy.asset_class_of(&holding.symbol) {
            *values.entry(Bucket::Class(class)).or_insert(0.0) +=
                Portfolio::holding_value(holding, prices);
        }
    }

    values
        .into_iter()
        .map(|(bucket, value)| (bucket, value / total_value))
        .collect()
}

/// Drift for every class in `target`, in the target's declaration order.
/// A class absent from the portfolio has a current weight of zero.
pub fn compute_drift(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    target: &TargetAllocation,
) -> Vec<Drift> {
    let current = calculate_current_allocation(portfolio, prices, policy);
    let total_value = portfolio.total_value(prices);

    target
        .iter()
        .map(|(asset_class, target_fraction)| {
            let current_fraction = current
                .get(&Bucket::Class(asset_class))
                .copied()
                .unwrap_or(0.0);
            let drift = target_fraction - current_fraction;
            Drift {
                asset_class,
                target: target_fraction,
                current: current_fraction,
                drift,
                dollar_amount: drift * total_value,
            }
        })
        .collect()
}

/// BUY recommendations that move cash into underweight classes, largest gap
/// first, until cash runs out. An unknown risk profile yields nothing.
///
/// A class whose representative symbol has no tradable price gets no BUY and
/// consumes no cash.
pub fn generate_rebalancing_recommendations(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    risk_profile: &str,
    drift_threshold: f64,
) -> Vec<Recommendation> {
    let Some(target) = policy.target_allocation(risk_profile) else {
        debug!(risk_profile, "no target allocation for risk profile");
        return Vec::new();
    };

    let mut trades: Vec<Drift> = Vec::new();
    for drift in compute_drift(portfolio, prices, policy, target) {
        if !drift.exceeds(drift_threshold) {
            continue;
        }
        if drift.is_underweight() {
            trades.push(drift);
        } else {
            debug!(
                asset_class = %drift.asset_class,
                drift = drift.drift,
                "overweight, no sell generated"
            );
        }
    }
    trades.sort_by(|a, b| b.dollar_amount.total_cmp(&a.dollar_amount));

    let mut recommendations = Vec::new();
    let mut cash_remaining = portfolio.cash;

    for trade in trades {
        if cash_remaining <= 0.0 {
            break;
        }
        let Some(symbol) = policy.representative_symbol(trade.asset_class) else {
            debug!(asset_class = %trade.asset_class, "no symbol mapped to asset class");
            continue;
        };
        let Some(price) = prices.tradable_price(symbol) else {
            warn!(
                asset_class = %trade.asset_class,
                symbol,
                "no price for representative symbol, rebalancing buy skipped"
            );
            continue;
        };

        let buy_amount = trade.dollar_amount.min(cash_remaining);
        debug!(
            asset_class = %trade.asset_class,
            symbol,
            drift = trade.drift,
            buy_amount,
            "rebalancing buy"
        );
        recommendations.push(Recommendation::rebalance_buy(
            symbol,
            buy_amount / price,
            buy_amount,
            trade.asset_class,
            trade.target,
        ));
        cash_remaining -= buy_amount;
    }

    recommendations
}
