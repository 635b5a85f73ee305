//! Z-score of price against its moving average.
//!
//! deviation[i] = C[i] - MA(n)[i]
//! Z(n)[i] = deviation[i] / sample_stddev(deviation[i-n+1..=i])
//!
//! A rolling stddev that is zero relative to the price yields 0.0, so a
//! perfectly linear trend (constant deviation) reads as no signal.
//! Warmup: MA needs n-1 bars, the deviation window another n-1, so the
//! first 2n-2 bars are invalid. n < 2 is never valid.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, MaKind, calculate_ma,
};
use crate::domain::ohlcv::OhlcvBar;

/// Spread below this fraction of the close is rounding noise.
const SPREAD_TOLERANCE: f64 = 1e-10;

pub fn calculate_zscore(bars: &[OhlcvBar], period: usize, ma: MaKind) -> IndicatorSeries {
    let indicator_type = IndicatorType::ZScore { period, ma };
    if period < 2 {
        return IndicatorSeries::invalid(indicator_type, bars);
    }

    let ma_series = calculate_ma(bars, period, ma);
    let deviations: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| ma_series.simple_at(i).map(|m| bar.close - m))
        .collect();

    let mut values = Vec::with_capacity(bars.len());
    let mut window = Vec::with_capacity(period);

    for (i, bar) in bars.iter().enumerate() {
        let z = if i + 1 >= period {
            window.clear();
            window.extend(deviations[i + 1 - period..=i].iter().flatten());
            if window.len() == period {
                let stddev = sample_stddev(&window);
                let current = window[period - 1];
                Some(if stddev > SPREAD_TOLERANCE * bar.close.abs() {
                    current / stddev
                } else {
                    0.0
                })
            } else {
                None
            }
        } else {
            None
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: z.is_some(),
            value: IndicatorValue::Simple(z.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
