//! Port traits: configuration source and report sinks.

pub mod config_port;
pub mod report_port;
