//! Runs both engines and merges their output.

use std::collections::BTreeMap;

use tracing::info;

use super::impact::ImpactSummary;
use super::policy::{Policy, AGGRESSIVE};
use super::portfolio::Portfolio;
use super::rebalancing::{generate_rebalancing_recommendations, DEFAULT_DRIFT_THRESHOLD};
use super::recommendation::Recommendation;
use super::tlh;
use crate::ports::price_port::PricePort;

pub const DEFAULT_TAX_RATE: f64 = 0.15;

/// Per-run inputs that are not part of the portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub risk_profile: String,
    /// Expected in [0, 1] but not enforced.
    pub tax_rate: f64,
    pub drift_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            risk_profile: AGGRESSIVE.to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            drift_threshold: DEFAULT_DRIFT_THRESHOLD,
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub recommendations: Vec<Recommendation>,
    pub impact: ImpactSummary,
    /// Replacement quotes invented during harvesting, local to this run.
    pub synthesized_prices: BTreeMap<String, f64>,
}

/// Harvesting recommendations followed by rebalancing recommendations.
///
/// The engines run independently against the same pre-trade portfolio.
/// Nothing is deduplicated: a replacement BUY and a rebalancing BUY may name
/// the same symbol.
pub fn generate_recommendations(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    config: &RunConfig,
) -> Vec<Recommendation> {
    advise(portfolio, prices, policy, config).recommendations
}

pub fn advise(
    portfolio: &Portfolio,
    prices: &dyn PricePort,
    policy: &Policy,
    config: &RunConfig,
) -> Advice {
    let harvest = tlh::harvest(portfolio, prices, policy, config.tax_rate);
    let rebalancing = generate_rebalancing_recommendations(
        portfolio,
        prices,
        policy,
        &config.risk_profile,
        config.drift_threshold,
    );
    info!(
        harvest = harvest.recommendations.len(),
        rebalance = rebalancing.len(),
        risk_profile = %config.risk_profile,
        "recommendations generated"
    );

    let mut recommendations = harvest.recommendations;
    recommendations.extend(rebalancing);
    let impact = ImpactSummary::from_recommendations(&recommendations);

    Advice {
        recommendations,
        impact,
        synthesized_prices: harvest.synthesized_prices,
    }
}
