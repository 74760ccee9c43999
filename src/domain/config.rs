//! Simulation configuration and validation.
//!
//! Values resolve in three layers: built-in defaults, then the INI file
//! (sections `[series]`, `[execution]`, `[report]`), then CLI overrides.
//! Every field is validated before the pipeline runs.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::error::TwapError;
use super::series::SeriesParams;
use super::twap::ExecutionParams;
use crate::ports::config_port::ConfigPort;

const KNOWN_SECTIONS: [&str; 3] = ["series", "execution", "report"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationConfig {
    pub series: SeriesParams,
    pub execution: ExecutionParams,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), TwapError> {
        self.series.validate()?;
        self.execution.validate(self.series.records)?;
        Ok(())
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TwapError> {
        for section in config.sections() {
            if !KNOWN_SECTIONS.contains(&section.as_str()) {
                log::warn!("ignoring unknown config section [{}]", section);
            }
        }

        let defaults = SimulationConfig::default();
        let series = SeriesParams {
            records: parse_or(config, "series", "records", defaults.series.records)?,
            seed: parse_or(config, "series", "seed", defaults.series.seed)?,
            start: match config.get_string("series", "start") {
                Some(raw) => parse_timestamp(&raw).ok_or_else(|| TwapError::ConfigInvalid {
                    section: "series".into(),
                    key: "start".into(),
                    reason: "invalid timestamp (expected YYYY-MM-DDTHH:MM:SS)".into(),
                })?,
                None => defaults.series.start,
            },
            interval_secs: parse_or(
                config,
                "series",
                "interval_secs",
                defaults.series.interval_secs,
            )?,
            drift: parse_or(config, "series", "drift", defaults.series.drift)?,
            volatility: parse_or(config, "series", "volatility", defaults.series.volatility)?,
            volume_min: parse_or(config, "series", "volume_min", defaults.series.volume_min)?,
            volume_max: parse_or(config, "series", "volume_max", defaults.series.volume_max)?,
        };
        let execution = ExecutionParams {
            num_trades: parse_or(
                config,
                "execution",
                "num_trades",
                defaults.execution.num_trades,
            )?,
            total_volume: parse_or(
                config,
                "execution",
                "total_volume",
                defaults.execution.total_volume,
            )?,
            remainder: parse_or(config, "execution", "remainder", defaults.execution.remainder)?,
        };

        Ok(SimulationConfig { series, execution })
    }
}

/// Output locations for the report sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub chart_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

pub const DEFAULT_CHART_PATH: &str = "twap_execution.svg";

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            chart_path: Some(PathBuf::from(DEFAULT_CHART_PATH)),
            csv_path: None,
        }
    }
}

impl ReportConfig {
    /// A blank `chart_path =` disables the chart; an absent key keeps the default.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = ReportConfig::default();
        ReportConfig {
            chart_path: match config.get_string("report", "chart_path") {
                Some(raw) if raw.trim().is_empty() => None,
                Some(raw) => Some(PathBuf::from(raw.trim())),
                None => defaults.chart_path,
            },
            csv_path: config
                .get_string("report", "csv_path")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_or<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, TwapError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(section, key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| TwapError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
