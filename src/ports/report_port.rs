//! Report sink port trait.

use std::path::Path;

use crate::domain::error::TwapError;
use crate::domain::simulation::SimulationReport;

/// Port for writing a finished simulation run somewhere durable.
pub trait ReportPort {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), TwapError>;

    /// Short label used in log lines.
    fn name(&self) -> &'static str;
}
