#![allow(dead_code)]

use chrono::TimeDelta;
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use twapsim::domain::error::TwapError;
use twapsim::domain::series::{default_start, Series, Tick};
use twapsim::domain::simulation::SimulationReport;
use twapsim::ports::report_port::ReportPort;

/// Report sink that remembers what it was asked to write.
pub struct RecordingSink {
    pub writes: RefCell<Vec<(PathBuf, usize)>>,
    pub fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            writes: RefCell::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            writes: RefCell::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }
}

impl ReportPort for RecordingSink {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), TwapError> {
        if let Some(reason) = &self.fail_with {
            return Err(TwapError::Export {
                path: output_path.display().to_string(),
                reason: reason.clone(),
            });
        }
        self.writes
            .borrow_mut()
            .push((output_path.to_path_buf(), report.schedule.slices.len()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn make_series(points: &[(f64, i64)]) -> Series {
    let ticks = points
        .iter()
        .enumerate()
        .map(|(i, &(price, volume))| Tick {
            timestamp: default_start() + TimeDelta::minutes(i as i64),
            price,
            volume,
        })
        .collect();
    Series::from_ticks(ticks).unwrap()
}

/// Prices 0, 1, 2, ... with constant volume.
pub fn ramp_series(n: usize) -> Series {
    let points: Vec<(f64, i64)> = (0..n).map(|i| (i as f64, 100)).collect();
    make_series(&points)
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const VALID_INI: &str = r#"
[series]
records = 100
seed = 42
start = 2025-01-01T00:00:00
interval_secs = 60
drift = 100.0
volatility = 0.5
volume_min = 100
volume_max = 1000

[execution]
num_trades = 10
total_volume = 10000
remainder = exclude
"#;
