//! Core domain types and logic.

pub mod series;
pub mod vwap;
pub mod twap;
pub mod metrics;
pub mod config;
pub mod simulation;
pub mod error;
