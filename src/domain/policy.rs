//! Policy tables: asset-class mapping, target allocations per risk profile,
//! and wash-sale replacement mapping.
//!
//! A `Policy` is passed explicitly to every engine entry point. The default
//! value carries the built-in MVP tables; every table can be replaced from
//! configuration.

use std::collections::HashMap;

use super::asset_class::AssetClass;

/// Synthesized replacement price = harvested price × this markup, used when
/// no quote for the replacement symbol is available.
pub const DEFAULT_REPLACEMENT_MARKUP: f64 = 1.01;

pub const AGGRESSIVE: &str = "Aggressive";
pub const MODERATE: &str = "Moderate";

/// Target fraction per asset class for one risk profile. Fractions are not
/// normalized; anything short of 1.0 is an implicit cash target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetAllocation {
    weights: Vec<(AssetClass, f64)>,
}

impl TargetAllocation {
    pub fn new(weights: Vec<(AssetClass, f64)>) -> Self {
        let mut target = TargetAllocation::default();
        for (class, fraction) in weights {
            target.set(class, fraction);
        }
        target
    }

    /// Sets a class's fraction, keeping its original position if already present.
    pub fn set(&mut self, class: AssetClass, fraction: f64) {
        match self.weights.iter_mut().find(|(c, _)| *c == class) {
            Some(entry) => entry.1 = fraction,
            None => self.weights.push((class, fraction)),
        }
    }

    pub fn get(&self, class: AssetClass) -> Option<f64> {
        self.weights
            .iter()
            .find(|(c, _)| *c == class)
            .map(|&(_, fraction)| fraction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        self.weights.iter().copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|&(_, fraction)| fraction).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Declaration order is significant: the first symbol mapped to a class
    /// is that class's representative for rebalancing buys.
    asset_classes: Vec<(String, AssetClass)>,
    targets: Vec<(String, TargetAllocation)>,
    replacements: HashMap<String, String>,
    pub replacement_markup: f64,
}

impl Policy {
    /// A policy with no tables; every engine produces nothing against it.
    pub fn empty() -> Self {
        Policy {
            asset_classes: Vec::new(),
            targets: Vec::new(),
            replacements: HashMap::new(),
            replacement_markup: DEFAULT_REPLACEMENT_MARKUP,
        }
    }

    pub fn with_asset_class(mut self, symbol: &str, class: AssetClass) -> Self {
        self.set_asset_class(symbol, class);
        self
    }

    pub fn with_target(mut self, profile: &str, target: TargetAllocation) -> Self {
        self.set_target(profile, target);
        self
    }

    pub fn with_replacement(mut self, symbol: &str, replacement: &str) -> Self {
        self.set_replacement(symbol, replacement);
        self
    }

    pub fn with_replacement_markup(mut self, markup: f64) -> Self {
        self.replacement_markup = markup;
        self
    }

    pub fn set_asset_class(&mut self, symbol: &str, class: AssetClass) {
        match self.asset_classes.iter_mut().find(|(s, _)| s == symbol) {
            Some(entry) => entry.1 = class,
            None => self.asset_classes.push((symbol.to_string(), class)),
        }
    }

    pub fn set_target(&mut self, profile: &str, target: TargetAllocation) {
        match self.targets.iter_mut().find(|(p, _)| p == profile) {
            Some(entry) => entry.1 = target,
            None => self.targets.push((profile.to_string(), target)),
        }
    }

    pub fn set_replacement(&mut self, symbol: &str, replacement: &str) {
        self.replacements
            .insert(symbol.to_string(), replacement.to_string());
    }

    pub fn clear_asset_classes(&mut self) {
        self.asset_classes.clear();
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn clear_replacements(&mut self) {
        self.replacements.clear();
    }

    pub fn asset_class_of(&self, symbol: &str) -> Option<AssetClass> {
        self.asset_classes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|&(_, class)| class)
    }

    pub fn asset_classes(&self) -> impl Iterator<Item = (&str, AssetClass)> {
        self.asset_classes.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// First symbol in declaration order mapped to `class`.
    pub fn representative_symbol(&self, class: AssetClass) -> Option<&str> {
        self.asset_classes
            .iter()
            .find(|(_, c)| *c == class)
            .map(|(s, _)| s.as_str())
    }

    /// Exact, case-sensitive profile lookup.
    pub fn target_allocation(&self, profile: &str) -> Option<&TargetAllocation> {
        self.targets
            .iter()
            .find(|(p, _)| p == profile)
            .map(|(_, target)| target)
    }

    pub fn risk_profiles(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|(p, _)| p.as_str())
    }

    pub fn targets(&self) -> impl Iterator<Item = (&str, &TargetAllocation)> {
        self.targets.iter().map(|(p, t)| (p.as_str(), t))
    }

    pub fn replacement_for(&self, symbol: &str) -> Option<&str> {
        self.replacements.get(symbol).map(String::as_str)
    }

    /// Replacement pairs sorted by symbol.
    pub fn replacements(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .replacements
            .iter()
            .map(|(s, r)| (s.as_str(), r.as_str()))
            .collect();
        pairs.sort();
        pairs
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::empty()
            .with_asset_class("VTI", AssetClass::UsStocks)
            .with_asset_class("IVV", AssetClass::UsStocks)
            .with_asset_class("VOO", AssetClass::UsStocks)
            .with_asset_class("VXUS", AssetClass::IntlStocks)
            .with_asset_class("IXUS", AssetClass::IntlStocks)
            .with_asset_class("BND", AssetClass::Bonds)
            .with_asset_class("AGG", AssetClass::Bonds)
            .with_target(
                AGGRESSIVE,
                TargetAllocation::new(vec![
                    (AssetClass::UsStocks, 0.55),
                    (AssetClass::IntlStocks, 0.25),
                    (AssetClass::Bonds, 0.20),
                ]),
            )
            .with_target(
                MODERATE,
                TargetAllocation::new(vec![
                    (AssetClass::UsStocks, 0.40),
                    (AssetClass::IntlStocks, 0.20),
                    (AssetClass::Bonds, 0.40),
                ]),
            )
            .with_replacement("VTI", "IVV")
            .with_replacement("IVV", "VOO")
            .with_replacement("VXUS", "IXUS")
            .with_replacement("BND", "AGG")
    }
}
