//! Plain-text report adapter implementing ReportPort.
//!
//! Renders a fixed-width recommendation table followed by the impact
//! analysis block.

use std::io::Write;

use crate::domain::error::AtlasError;
use crate::domain::impact::ImpactSummary;
use crate::domain::rebalancing::{Allocation, Drift};
use crate::domain::recommendation::{format_dollars, Recommendation};
use crate::ports::report_port::ReportPort;

pub const NO_ACTION_MESSAGE: &str = "No actions are recommended at this time.";

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// `$1,234.56` with thousands separators.
pub fn format_dollars_grouped(amount: f64) -> String {
    let plain = format!("{:.2}", amount.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && plain != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn format_table(recommendations: &[Recommendation]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<6} {:<8} {:>12} {:>14}  {}\n",
        "ACTION", "SYMBOL", "QUANTITY", "AMOUNT", "REASON"
    ));
    for rec in recommendations {
        let mut reason = rec.reason.clone();
        if let Some(savings) = rec.estimated_tax_savings {
            reason.push_str(&format!(" Est. tax savings {}.", format_dollars(savings)));
        }
        output.push_str(&format!(
            "{:<6} {:<8} {:>12.2} {:>14}  {}\n",
            rec.action.to_string(),
            rec.symbol,
            rec.quantity,
            format_dollars_grouped(rec.notional),
            reason
        ));
    }
    output
}

pub fn format_impact(impact: &ImpactSummary) -> String {
    let mut output = String::new();
    output.push_str("Impact Analysis\n");
    output.push_str(&format!(
        "  Total Loss Harvested:  {}\n",
        format_dollars_grouped(impact.total_harvested_loss)
    ));
    output.push_str(&format!(
        "  Estimated Tax Savings: {}\n",
        format_dollars_grouped(impact.estimated_tax_savings)
    ));
    output.push_str(&format!(
        "  Trades:                {} buy, {} sell\n",
        impact.buy_count, impact.sell_count
    ));
    output.push_str(&format!(
        "  Net Cash Flow:         {}\n",
        format_dollars_grouped(impact.net_cash_flow())
    ));
    output
}

/// Current weight per bucket, then the drift of each targeted class.
/// Classes beyond the threshold are marked with `*`.
pub fn format_allocation(
    allocation: &Allocation,
    drifts: &[Drift],
    risk_profile: &str,
    threshold: f64,
) -> String {
    let mut output = String::new();
    if allocation.is_empty() {
        output.push_str("Portfolio has no value; allocation is undefined.\n");
    } else {
        output.push_str(&format!("{:<12} {:>9}\n", "BUCKET", "CURRENT"));
        for (bucket, weight) in allocation {
            output.push_str(&format!(
                "{:<12} {:>8.2}%\n",
                bucket.to_string(),
                weight * 100.0
            ));
        }
    }

    if drifts.is_empty() {
        return output;
    }
    output.push_str(&format!(
        "\nDrift vs {risk_profile} (threshold {:.2}%)\n",
        threshold * 100.0
    ));
    output.push_str(&format!(
        "{:<12} {:>9} {:>9} {:>9} {:>14}\n",
        "CLASS", "TARGET", "CURRENT", "DRIFT", "AMOUNT"
    ));
    for drift in drifts {
        let marker = if drift.exceeds(threshold) { "  *" } else { "" };
        output.push_str(&format!(
            "{:<12} {:>8.2}% {:>8.2}% {:>+8.2}% {:>14}{marker}\n",
            drift.asset_class.to_string(),
            drift.target * 100.0,
            drift.current * 100.0,
            drift.drift * 100.0,
            format_dollars_grouped(drift.dollar_amount),
        ));
    }
    output
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        recommendations: &[Recommendation],
        impact: &ImpactSummary,
        out: &mut dyn Write,
    ) -> Result<(), AtlasError> {
        let mut text = String::new();
        if recommendations.is_empty() {
            text.push_str(NO_ACTION_MESSAGE);
            text.push('\n');
        } else {
            text.push_str(&format_table(recommendations));
            if impact.has_harvest() {
                text.push('\n');
                text.push_str(&format_impact(impact));
            }
        }
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}
