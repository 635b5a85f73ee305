//! CSV signal report adapter implementing ReportPort.
//!
//! One row per bar: `date,close,signal,strength,position,unrealized_pnl_pct`.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::error::QuantError;
use crate::domain::runner::{SignalRow, StrategyRun};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct ReportRow {
    date: String,
    close: f64,
    signal: String,
    strength: String,
    position: String,
    unrealized_pnl_pct: String,
}

impl From<&SignalRow> for ReportRow {
    fn from(row: &SignalRow) -> Self {
        ReportRow {
            date: row.date.format("%Y-%m-%d").to_string(),
            close: row.close,
            signal: row.signal.to_string(),
            strength: format!("{:.4}", row.strength),
            position: row.position.to_string(),
            unrealized_pnl_pct: format!("{:.4}", row.unrealized_pnl_pct),
        }
    }
}

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, run: &StrategyRun, output_path: &Path) -> Result<(), QuantError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(output_path).map_err(|e| QuantError::DataSource {
            reason: format!("{}: {}", output_path.display(), e),
        })?;
        for row in &run.rows {
            writer
                .serialize(ReportRow::from(row))
                .map_err(|e| QuantError::DataSource {
                    reason: format!("{}: {}", output_path.display(), e),
                })?;
        }
        writer.flush()?;

        info!(
            path = %output_path.display(),
            rows = run.rows.len(),
            strategy = %run.strategy_name,
            "wrote signal report"
        );
        Ok(())
    }
}
