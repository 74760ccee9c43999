//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod svg_chart_adapter;
pub mod csv_export_adapter;
