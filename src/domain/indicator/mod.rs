//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series carries one point per input bar. Points inside the warmup
//! window are marked `valid == false` and hold a zero placeholder.

pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod zscore;

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

/// Moving average flavour used by strategies that accept either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    ZScore {
        period: usize,
        ma: MaKind,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// An all-invalid series aligned with `bars`.
    pub(crate) fn invalid(indicator_type: IndicatorType, bars: &[OhlcvBar]) -> Self {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect();
        IndicatorSeries {
            indicator_type,
            values,
        }
    }

    /// Scalar value at `index`, or `None` during warmup or out of range.
    pub fn simple_at(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value: IndicatorValue::Simple(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    /// `(upper, middle, lower)` at `index` for band-shaped series.
    pub fn bands_at(&self, index: usize) -> Option<(f64, f64, f64)> {
        match self.values.get(index) {
            Some(IndicatorPoint {
                valid: true,
                value:
                    IndicatorValue::Bollinger {
                        upper,
                        middle,
                        lower,
                    },
                ..
            }) => Some((*upper, *middle, *lower)),
            _ => None,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

/// SMA or EMA over `period`, whichever `kind` selects.
pub fn calculate_ma(bars: &[OhlcvBar], period: usize, kind: MaKind) -> IndicatorSeries {
    match kind {
        MaKind::Sma => sma::calculate_sma(bars, period),
        MaKind::Ema => ema::calculate_ema(bars, period),
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaKind::Sma => write!(f, "SMA"),
            MaKind::Ema => write!(f, "EMA"),
        }
    }
}

impl FromStr for MaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SMA" => Ok(MaKind::Sma),
            "EMA" => Ok(MaKind::Ema),
            other => Err(format!("moving average type must be SMA or EMA, got '{other}'")),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::ZScore { period, ma } => write!(f, "ZSCORE({},{})", period, ma),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn indicator_type_display_zscore() {
        let z = IndicatorType::ZScore {
            period: 20,
            ma: MaKind::Ema,
        };
        assert_eq!(z.to_string(), "ZSCORE(20,EMA)");
    }

    #[test]
    fn ma_kind_parses_case_insensitive() {
        assert_eq!("sma".parse::<MaKind>(), Ok(MaKind::Sma));
        assert_eq!(" EMA ".parse::<MaKind>(), Ok(MaKind::Ema));
        assert!("WMA".parse::<MaKind>().is_err());
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Sma(20), "sma20");
        map.insert(IndicatorType::Rsi(14), "rsi14");

        assert_eq!(map.get(&IndicatorType::Sma(20)), Some(&"sma20"));
        assert_eq!(map.get(&IndicatorType::Rsi(14)), Some(&"rsi14"));
        assert_eq!(map.get(&IndicatorType::Ema(20)), None);
    }

    #[test]
    fn simple_at_skips_invalid_points() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Sma(2),
            values: vec![
                IndicatorPoint {
                    date,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                },
                IndicatorPoint {
                    date,
                    valid: true,
                    value: IndicatorValue::Simple(4.5),
                },
            ],
        };
        assert_eq!(series.simple_at(0), None);
        assert_eq!(series.simple_at(1), Some(4.5));
        assert_eq!(series.simple_at(2), None);
        assert_eq!(series.bands_at(1), None);
        assert_eq!(series.valid_count(), 1);
    }
}
