//! Impact analysis over a recommendation list.

use serde::Serialize;

use super::recommendation::{Action, Recommendation};

/// Totals read from the typed fields of a recommendation list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImpactSummary {
    pub total_harvested_loss: f64,
    pub estimated_tax_savings: f64,
    pub buy_count: usize,
    pub sell_count: usize,
    /// Dollars spent by all BUYs.
    pub total_bought: f64,
    /// Dollars raised by all SELLs.
    pub total_sold: f64,
}

impl ImpactSummary {
    pub fn from_recommendations(recommendations: &[Recommendation]) -> Self {
        let mut summary = ImpactSummary::default();
        for rec in recommendations {
            match rec.action {
                Action::Buy => {
                    summary.buy_count += 1;
                    summary.total_bought += rec.notional;
                }
                Action::Sell => {
                    summary.sell_count += 1;
                    summary.total_sold += rec.notional;
                }
            }
            summary.total_harvested_loss += rec.harvested_loss.unwrap_or(0.0);
            summary.estimated_tax_savings += rec.estimated_tax_savings.unwrap_or(0.0);
        }
        summary
    }

    pub fn has_harvest(&self) -> bool {
        self.total_harvested_loss > 0.0
    }

    /// Sale proceeds minus purchase cost; negative when new cash is spent.
    pub fn net_cash_flow(&self) -> f64 {
        self.total_sold - self.total_bought
    }
}
