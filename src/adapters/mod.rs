//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod static_price_adapter;
pub mod text_report;
pub mod json_report;
