//! CSV price file adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume` and dates as `YYYY-MM-DD`.

use crate::domain::error::QuantError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize, Serialize)]
struct PriceRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl PriceRow {
    fn into_bar(self, symbol: &str) -> Result<OhlcvBar, String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", self.date, e))?;
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "{field} on {} must be a positive price, got {value}",
                    self.date
                ));
            }
        }
        Ok(OhlcvBar {
            symbol: symbol.to_string(),
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

impl From<&OhlcvBar> for PriceRow {
    fn from(bar: &OhlcvBar) -> Self {
        PriceRow {
            date: bar.date.format(DATE_FORMAT).to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Write `bars` to `<base>/<symbol>.csv`, creating the directory if
    /// needed. Returns the written path.
    pub fn write_bars(&self, symbol: &str, bars: &[OhlcvBar]) -> Result<PathBuf, QuantError> {
        fs::create_dir_all(&self.base_path)?;
        let path = self.csv_path(symbol);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;
        for bar in bars {
            writer
                .serialize(PriceRow::from(bar))
                .map_err(|e| csv_error(&path, e))?;
        }
        writer.flush()?;
        debug!(path = %path.display(), rows = bars.len(), "wrote price file");
        Ok(path)
    }
}

fn csv_error(path: &Path, err: csv::Error) -> QuantError {
    QuantError::DataSource {
        reason: format!("{}: {}", path.display(), err),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, QuantError> {
        let path = self.csv_path(symbol);
        if !path.is_file() {
            return Err(QuantError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| csv_error(&path, e))?;

        let mut bars = Vec::new();
        for (index, result) in rdr.deserialize::<PriceRow>().enumerate() {
            let row = result.map_err(|e| csv_error(&path, e))?;
            // header is line 1
            let bar = row.into_bar(symbol).map_err(|reason| QuantError::DataSource {
                reason: format!("{} line {}: {}", path.display(), index + 2, reason),
            })?;
            if start_date.is_some_and(|s| bar.date < s) || end_date.is_some_and(|e| bar.date > e) {
                continue;
            }
            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(QuantError::NoData {
                symbol: symbol.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price file");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
