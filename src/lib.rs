//! twapsim — synthetic TWAP execution simulator.
//!
//! Hexagonal layout: pure pipeline logic in [`domain`], port traits in [`ports`],
//! concrete sinks and config readers in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
