//! Asset classes and allocation buckets.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    UsStocks,
    IntlStocks,
    Bonds,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [AssetClass::UsStocks, AssetClass::IntlStocks, AssetClass::Bonds];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::UsStocks => "US_STOCKS",
            AssetClass::IntlStocks => "INTL_STOCKS",
            AssetClass::Bonds => "BONDS",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US_STOCKS" => Ok(AssetClass::UsStocks),
            "INTL_STOCKS" => Ok(AssetClass::IntlStocks),
            "BONDS" => Ok(AssetClass::Bonds),
            other => Err(format!(
                "unknown asset class {other:?} (expected US_STOCKS, INTL_STOCKS or BONDS)"
            )),
        }
    }
}

/// A slice of the current allocation: one asset class, or uninvested cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Class(AssetClass),
    Cash,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Class(class) => class.fmt(f),
            Bucket::Cash => f.write_str("CASH"),
        }
    }
}

impl From<AssetClass> for Bucket {
    fn from(class: AssetClass) -> Self {
        Bucket::Class(class)
    }
}
