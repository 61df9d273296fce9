//! Core domain types and the two recommendation engines.

pub mod holding;
pub mod portfolio;
pub mod asset_class;
pub mod policy;
pub mod recommendation;
pub mod tlh;
pub mod rebalancing;
pub mod recommendations;
pub mod impact;
pub mod config_validation;
pub mod error;
