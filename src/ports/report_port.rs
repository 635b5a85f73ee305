//! Signal report port trait.

use crate::domain::error::QuantError;
use crate::domain::runner::StrategyRun;
use std::path::Path;

/// Port for persisting the per-bar output of a strategy run.
pub trait ReportPort {
    fn write(&self, run: &StrategyRun, output_path: &Path) -> Result<(), QuantError>;
}
