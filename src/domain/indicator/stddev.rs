//! Standard Deviation indicator.
//!
//! Sample standard deviation over n closing prices (divides by n-1).
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! Warmup: first (n-1) bars are invalid. n < 2 never produces a valid point.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{OhlcvBar, closes};

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period < 2 {
        return IndicatorSeries::invalid(IndicatorType::Stddev(period), bars);
    }

    let closes = closes(bars);
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = i + 1 >= period;
        let value = if valid {
            sample_stddev(&closes[i + 1 - period..=i])
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Sample standard deviation of `window`; 0.0 for fewer than two values.
pub fn sample_stddev(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / n as f64;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                symbol: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_stddev(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn stddev_constant_values() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let series = calculate_stddev(&bars, 3);
        assert!(series.simple_at(2).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_basic_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 3);
        // deviations -10, 0, 10 → variance 200 / 2
        assert!((series.simple_at(2).unwrap() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let series = calculate_stddev(&bars, 8);
        // sum of squared deviations = 32, n-1 = 7
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((series.simple_at(7).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn stddev_period_1_is_never_valid() {
        let series = calculate_stddev(&make_bars(&[1.0, 2.0, 3.0]), 1);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sample_stddev_short_window() {
        assert_eq!(sample_stddev(&[]), 0.0);
        assert_eq!(sample_stddev(&[5.0]), 0.0);
    }

    #[test]
    fn stddev_indicator_type() {
        let series = calculate_stddev(&make_bars(&[10.0, 20.0, 30.0]), 5);
        assert_eq!(series.indicator_type, IndicatorType::Stddev(5));
    }
}
