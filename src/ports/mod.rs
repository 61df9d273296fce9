//! Port traits the domain depends on.

pub mod price_port;
pub mod holdings_port;
pub mod config_port;
pub mod report_port;
