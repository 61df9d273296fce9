//! Configuration validation.
//!
//! Validates run settings and policy tables before any engine runs. The
//! engines themselves never reject input.

use tracing::warn;

use crate::domain::asset_class::AssetClass;
use crate::domain::error::AtlasError;
use crate::ports::config_port::ConfigPort;

pub const RUN_SECTION: &str = "run";
pub const PRICES_SECTION: &str = "prices";
pub const ASSET_CLASSES_SECTION: &str = "asset_classes";
pub const REPLACEMENTS_SECTION: &str = "replacements";
pub const POLICY_SECTION: &str = "policy";
pub const TARGET_SECTION_PREFIX: &str = "target.";

/// Slack allowed when checking that target fractions do not exceed 1.0.
pub const TARGET_SUM_TOLERANCE: f64 = 1e-9;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    validate_cash(config)?;
    validate_tax_rate(config)?;
    validate_drift_threshold(config)?;
    Ok(())
}

pub fn validate_policy_config(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    validate_prices(config)?;
    validate_asset_classes(config)?;
    validate_targets(config)?;
    validate_replacements(config)?;
    validate_markup(config)?;
    validate_representative_prices(config)?;
    Ok(())
}

/// Reads an optional numeric key, failing on a value that does not parse.
pub fn parse_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, AtlasError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| {
                AtlasError::config_invalid(section, key, format!("expected a number, got {raw:?}"))
            }),
    }
}

fn validate_cash(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    if let Some(cash) = parse_double(config, RUN_SECTION, "cash")? {
        if cash < 0.0 {
            return Err(AtlasError::config_invalid(
                RUN_SECTION,
                "cash",
                "cash must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_tax_rate(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    if let Some(rate) = parse_double(config, RUN_SECTION, "tax_rate")? {
        if !(0.0..=1.0).contains(&rate) {
            warn!(tax_rate = rate, "tax_rate outside [0, 1]; savings figures will scale with it");
        }
    }
    Ok(())
}

fn validate_drift_threshold(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    if let Some(threshold) = parse_double(config, RUN_SECTION, "drift_threshold")? {
        if !(0.0..1.0).contains(&threshold) {
            return Err(AtlasError::config_invalid(
                RUN_SECTION,
                "drift_threshold",
                "drift_threshold must be in [0, 1)",
            ));
        }
    }
    Ok(())
}

fn validate_prices(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    for (symbol, _) in config.entries(PRICES_SECTION) {
        let price = parse_double(config, PRICES_SECTION, &symbol)?.unwrap_or(0.0);
        if price <= 0.0 {
            return Err(AtlasError::config_invalid(
                PRICES_SECTION,
                &symbol,
                "price must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_asset_classes(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    for (symbol, class) in config.entries(ASSET_CLASSES_SECTION) {
        class
            .parse::<AssetClass>()
            .map_err(|reason| AtlasError::config_invalid(ASSET_CLASSES_SECTION, &symbol, reason))?;
    }
    Ok(())
}

/// Fractions must each lie in [0, 1] and sum to at most 1.0. A sum below 1.0
/// is accepted; the remainder is an implicit cash target.
fn validate_targets(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    for section in target_sections(config) {
        let mut total = 0.0;
        for (class, _) in config.entries(&section) {
            class
                .parse::<AssetClass>()
                .map_err(|reason| AtlasError::config_invalid(&section, &class, reason))?;
            let fraction = parse_double(config, &section, &class)?.unwrap_or(0.0);
            if !(0.0..=1.0).contains(&fraction) {
                return Err(AtlasError::config_invalid(
                    &section,
                    &class,
                    "target fraction must be in [0, 1]",
                ));
            }
            total += fraction;
        }
        if total > 1.0 + TARGET_SUM_TOLERANCE {
            return Err(AtlasError::config_invalid(
                &section,
                "*",
                format!("target fractions sum to {total}, more than 1.0"),
            ));
        }
    }
    Ok(())
}

fn validate_replacements(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    for (symbol, replacement) in config.entries(REPLACEMENTS_SECTION) {
        let replacement = replacement.trim();
        if replacement.is_empty() {
            return Err(AtlasError::config_invalid(
                REPLACEMENTS_SECTION,
                &symbol,
                "replacement symbol must not be empty",
            ));
        }
        if replacement == symbol {
            return Err(AtlasError::config_invalid(
                REPLACEMENTS_SECTION,
                &symbol,
                "a security cannot replace itself",
            ));
        }
    }
    Ok(())
}

fn validate_markup(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    if let Some(markup) = parse_double(config, POLICY_SECTION, "replacement_markup")? {
        if markup <= 0.0 {
            return Err(AtlasError::config_invalid(
                POLICY_SECTION,
                "replacement_markup",
                "replacement_markup must be positive",
            ));
        }
    }
    Ok(())
}

/// With a configured price table, every asset class a target names must have
/// a priced representative symbol; otherwise rebalancing could never buy it.
fn validate_representative_prices(config: &dyn ConfigPort) -> Result<(), AtlasError> {
    if !config.has_section(PRICES_SECTION) || !config.has_section(ASSET_CLASSES_SECTION) {
        return Ok(());
    }
    let mapping = config.entries(ASSET_CLASSES_SECTION);
    for section in target_sections(config) {
        for (class, _) in config.entries(&section) {
            let representative = mapping
                .iter()
                .find(|(_, c)| c.parse::<AssetClass>().ok() == class.parse::<AssetClass>().ok())
                .map(|(symbol, _)| symbol.as_str());
            if let Some(symbol) = representative {
                if config.get_string(PRICES_SECTION, symbol).is_none() {
                    return Err(AtlasError::config_invalid(
                        PRICES_SECTION,
                        symbol,
                        format!("no price for {symbol}, the representative of {class} in [{section}]"),
                    ));
                }
            }
        }
    }
    Ok(())
}

pub fn target_sections(config: &dyn ConfigPort) -> Vec<String> {
    config
        .sections()
        .into_iter()
        .filter(|s| s.starts_with(TARGET_SECTION_PREFIX) && s.len() > TARGET_SECTION_PREFIX.len())
        .collect()
}
