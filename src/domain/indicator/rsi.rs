//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain/loss are simple means of the last n close-to-close changes
//! (Cutler's variant), summed afresh over each bar's window:
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, unless avg_gain is also 0 (flat window): RSI = 50.
//! A flat window is neutral rather than oversold.
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return IndicatorSeries::invalid(IndicatorType::Rsi(period), bars);
    }

    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint {
        date: bars[0].date,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    });

    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

    for i in 1..bars.len() {
        let valid = i >= period;
        let rsi = if valid {
            let window = &changes[i - period..i];
            let gains: f64 = window.iter().map(|c| c.max(0.0)).sum();
            let losses: f64 = window.iter().map(|c| (-c).max(0.0)).sum();
            rsi_from_averages(gains / period as f64, losses / period as f64)
        } else {
            0.0
        };
        values.push(IndicatorPoint {
            date: bars[i].date,
            valid,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        (100.0 - (100.0 / (1.0 + avg_gain / avg_loss))).clamp(0.0, 100.0)
    }
}
