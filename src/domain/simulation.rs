//! End-to-end pipeline: generate -> VWAP -> TWAP -> metrics.

use super::config::SimulationConfig;
use super::error::TwapError;
use super::metrics::ExecutionMetrics;
use super::series::{generate_series, Series};
use super::twap::{simulate_twap, ExecutionSchedule};
use super::vwap::vwap_curve;

/// Everything a single run produces, handed to each report sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub series: Series,
    pub vwap: Vec<f64>,
    pub schedule: ExecutionSchedule,
    pub metrics: ExecutionMetrics,
}

pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, TwapError> {
    config.validate()?;

    let series = generate_series(&config.series)?;
    log::info!(
        "Generated {} records from seed {} ({} to {})",
        series.len(),
        config.series.seed,
        series.ticks()[0].timestamp,
        series.ticks()[series.len() - 1].timestamp,
    );

    let vwap = vwap_curve(&series)?;
    let schedule = simulate_twap(&series, &config.execution)?;
    log::info!(
        "Simulated {} TWAP slices of {} records ({} excluded, remainder policy: {})",
        schedule.slices.len(),
        schedule.interval,
        schedule.excluded,
        schedule.remainder,
    );

    let metrics = ExecutionMetrics::compute(&series, &vwap, &schedule)?;

    Ok(SimulationReport {
        config: config.clone(),
        series,
        vwap,
        schedule,
        metrics,
    })
}
