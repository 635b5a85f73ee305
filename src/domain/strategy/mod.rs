//! Signal-generating strategies.
//!
//! Each strategy validates its parameters on construction and then maps a
//! price series to one [`Signal`] per bar. Indicators are computed once over
//! the whole series; every indicator here is causal, so the value at bar `i`
//! only depends on bars `0..=i`.
//!
//! `strength` is a signed intensity in `[-1, 1]`: positive leans bullish,
//! negative leans bearish.

pub mod mean_reversion;
pub mod moving_average;
pub mod rsi;

use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;

pub use mean_reversion::{BollingerReversion, ZScoreMeanReversion};
pub use moving_average::{MovingAverageCrossover, MultiMaAlignment};
pub use rsi::{RsiDivergence, RsiThreshold};

pub trait Strategy {
    /// Display name including parameters, e.g. `MovingAverage(5,20,SMA)`.
    fn name(&self) -> String;

    fn parameters(&self) -> Vec<(&'static str, String)>;

    /// Bars needed before the strategy can emit anything other than HOLD.
    fn min_bars(&self) -> usize;

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal>;

    /// Per-bar intensity in `[-1, 1]`, bullish positive: an oversold RSI or
    /// a close below its average scores above zero.
    fn strength(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        self.signals(bars)
            .into_iter()
            .map(|s| f64::from(s.value()))
            .collect()
    }

    /// Indicator series the strategy reads, aligned with `bars`.
    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries>;
}

pub(crate) fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::NaiveDate;

    pub fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                symbol: "TEST".into(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }
}
