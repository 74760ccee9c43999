//! CSV export of the simulated series.
//!
//! One row per tick: `timestamp,price,volume,vwap,execution_price`. The
//! execution price is filled on the first tick of each TWAP slice and left
//! blank elsewhere.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::error::TwapError;
use crate::domain::simulation::SimulationReport;
use crate::ports::report_port::ReportPort;

const HEADER: [&str; 5] = ["timestamp", "price", "volume", "vwap", "execution_price"];

pub struct CsvExportAdapter;

impl CsvExportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Write the table to any sink; `write` wraps this with a file.
    pub fn write_to<W: std::io::Write>(
        &self,
        report: &SimulationReport,
        sink: W,
    ) -> Result<(), csv::Error> {
        let executions: HashMap<_, _> = report
            .schedule
            .slices
            .iter()
            .map(|s| (s.timestamp, s.price))
            .collect();

        let mut wtr = csv::Writer::from_writer(sink);
        wtr.write_record(HEADER)?;
        for (tick, vwap) in report.series.ticks().iter().zip(&report.vwap) {
            let execution = executions
                .get(&tick.timestamp)
                .map(|p| format!("{:.6}", p))
                .unwrap_or_default();
            wtr.write_record([
                tick.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
                format!("{:.6}", tick.price),
                tick.volume.to_string(),
                format!("{:.6}", vwap),
                execution,
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvExportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvExportAdapter {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), TwapError> {
        let export_err = |reason: String| TwapError::Export {
            path: output_path.display().to_string(),
            reason,
        };
        let file = std::fs::File::create(output_path).map_err(|e| export_err(e.to_string()))?;
        self.write_to(report, file)
            .map_err(|e| export_err(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
