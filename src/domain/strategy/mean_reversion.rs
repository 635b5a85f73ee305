//! Mean-reversion strategies: z-score against a moving average, and
//! Bollinger band touches.

use crate::domain::error::QuantError;
use crate::domain::indicator::bollinger::{calculate_bollinger, multiplier_x100};
use crate::domain::indicator::zscore::calculate_zscore;
use crate::domain::indicator::{IndicatorSeries, MaKind, calculate_ma};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, clamp_unit};

/// z-score magnitude treated as full strength.
const FULL_STRENGTH_Z: f64 = 3.0;

/// BUY when price is `threshold` deviations below its average, SELL when
/// it is `threshold` deviations above.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreMeanReversion {
    window: usize,
    threshold: f64,
    ma: MaKind,
}

impl ZScoreMeanReversion {
    pub fn new(window: usize, threshold: f64, ma: MaKind) -> Result<Self, QuantError> {
        let name = format!("MeanReversion({},{},{})", window, threshold, ma);
        if window < 2 {
            return Err(QuantError::invalid_parameter(&name, "window must be at least 2"));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(QuantError::invalid_parameter(&name, "threshold must be a positive number"));
        }
        Ok(Self {
            window,
            threshold,
            ma,
        })
    }

    fn zscores(&self, bars: &[OhlcvBar]) -> IndicatorSeries {
        calculate_zscore(bars, self.window, self.ma)
    }

    fn active(&self, index: usize) -> bool {
        index >= self.window * 2
    }
}

impl Default for ZScoreMeanReversion {
    fn default() -> Self {
        Self {
            window: 20,
            threshold: 2.0,
            ma: MaKind::Sma,
        }
    }
}

impl Strategy for ZScoreMeanReversion {
    fn name(&self) -> String {
        format!(
            "MeanReversion({},{},{})",
            self.window, self.threshold, self.ma
        )
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("window", self.window.to_string()),
            ("threshold", self.threshold.to_string()),
            ("ma_type", self.ma.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.window * 2 + 1
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let z = self.zscores(bars);
        (0..bars.len())
            .map(|i| match z.simple_at(i) {
                Some(v) if self.active(i) && v <= -self.threshold => Signal::Buy,
                Some(v) if self.active(i) && v >= self.threshold => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect()
    }

    fn strength(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        let z = self.zscores(bars);
        (0..bars.len())
            .map(|i| match z.simple_at(i) {
                Some(v) if self.active(i) => clamp_unit(-v / FULL_STRENGTH_Z),
                _ => 0.0,
            })
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        vec![calculate_ma(bars, self.window, self.ma), self.zscores(bars)]
    }
}

/// BUY when the close touches the lower band, SELL when it touches the
/// upper band.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerReversion {
    window: usize,
    std_multiplier: f64,
}

impl BollingerReversion {
    pub fn new(window: usize, std_multiplier: f64) -> Result<Self, QuantError> {
        let name = format!("BBMeanReversion({},{})", window, std_multiplier);
        if window < 2 {
            return Err(QuantError::invalid_parameter(&name, "window must be at least 2"));
        }
        if !std_multiplier.is_finite() || multiplier_x100(std_multiplier) == 0 {
            return Err(QuantError::invalid_parameter(
                &name,
                "std_multiplier must be a number of at least 0.005",
            ));
        }
        Ok(Self {
            window,
            std_multiplier,
        })
    }

    fn bands(&self, bars: &[OhlcvBar]) -> IndicatorSeries {
        calculate_bollinger(bars, self.window, multiplier_x100(self.std_multiplier))
    }
}

impl Default for BollingerReversion {
    fn default() -> Self {
        Self {
            window: 20,
            std_multiplier: 2.0,
        }
    }
}

impl Strategy for BollingerReversion {
    fn name(&self) -> String {
        format!("BBMeanReversion({},{})", self.window, self.std_multiplier)
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("window", self.window.to_string()),
            ("std_multiplier", self.std_multiplier.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.window + 1
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let bands = self.bands(bars);
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                if i < self.window {
                    return Signal::Hold;
                }
                match bands.bands_at(i) {
                    Some((_, _, lower)) if bar.close <= lower => Signal::Buy,
                    Some((upper, _, _)) if bar.close >= upper => Signal::Sell,
                    _ => Signal::Hold,
                }
            })
            .collect()
    }

    fn strength(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        // %B recentred: +1 at the lower band, -1 at the upper band
        let bands = self.bands(bars);
        bars.iter()
            .enumerate()
            .map(|(i, bar)| match bands.bands_at(i) {
                Some((upper, _, lower)) if i >= self.window && upper > lower => {
                    let percent_b = (bar.close - lower) / (upper - lower);
                    clamp_unit(1.0 - 2.0 * percent_b)
                }
                _ => 0.0,
            })
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        vec![self.bands(bars)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::test_support::make_bars;

    fn oscillating(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 }).collect()
    }

    #[test]
    fn zscore_validation() {
        assert!(ZScoreMeanReversion::new(1, 2.0, MaKind::Sma).is_err());
        assert!(ZScoreMeanReversion::new(20, 0.0, MaKind::Sma).is_err());
        assert!(ZScoreMeanReversion::new(20, f64::NAN, MaKind::Sma).is_err());
        assert!(ZScoreMeanReversion::new(20, f64::INFINITY, MaKind::Sma).is_err());
        let s = ZScoreMeanReversion::new(20, 1.5, MaKind::Ema).unwrap();
        assert_eq!(s.name(), "MeanReversion(20,1.5,EMA)");
        assert_eq!(s.min_bars(), 41);
    }

    #[test]
    fn zscore_sharp_drop_buys() {
        let mut prices = oscillating(20);
        prices.push(90.0);
        let s = ZScoreMeanReversion::new(5, 1.5, MaKind::Sma).unwrap();
        let signals = s.signals(&make_bars(&prices));

        assert!(signals[..10].iter().all(|s| *s == Signal::Hold));
        assert_eq!(signals[20], Signal::Buy);
    }

    #[test]
    fn zscore_sharp_spike_sells() {
        let mut prices = oscillating(20);
        prices.push(110.0);
        let s = ZScoreMeanReversion::new(5, 1.5, MaKind::Sma).unwrap();
        let bars = make_bars(&prices);
        assert_eq!(s.signals(&bars)[20], Signal::Sell);
        assert!(s.strength(&bars)[20] < 0.0);
    }

    #[test]
    fn zscore_holds_until_two_windows() {
        // z is already valid at index 2w-2, but signals wait for 2w
        let mut prices = oscillating(8);
        prices.push(80.0);
        let s = ZScoreMeanReversion::new(5, 0.5, MaKind::Sma).unwrap();
        let signals = s.signals(&make_bars(&prices));
        assert_eq!(signals[8], Signal::Hold);
    }

    #[test]
    fn zscore_indicators() {
        let s = ZScoreMeanReversion::default();
        let series = s.indicators(&make_bars(&oscillating(50)));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].indicator_type.to_string(), "SMA(20)");
        assert_eq!(series[1].indicator_type.to_string(), "ZSCORE(20,SMA)");
    }

    #[test]
    fn bollinger_validation() {
        assert!(BollingerReversion::new(1, 2.0).is_err());
        assert!(BollingerReversion::new(20, 0.0).is_err());
        assert!(BollingerReversion::new(20, -1.0).is_err());
        assert!(BollingerReversion::new(20, f64::NAN).is_err());
        assert!(BollingerReversion::new(20, f64::INFINITY).is_err());
        assert!(BollingerReversion::new(20, 0.01).is_ok());
        assert_eq!(BollingerReversion::default().name(), "BBMeanReversion(20,2)");
    }

    #[test]
    fn multiplier_that_rounds_to_zero_is_rejected() {
        // 0.004 would key the bands as BOLLINGER(5,0) and collapse them
        let err = BollingerReversion::new(5, 0.004).unwrap_err();
        assert!(matches!(err, QuantError::InvalidParameter { .. }));
    }

    #[test]
    fn bollinger_lower_band_touch_buys() {
        let mut prices = oscillating(10);
        prices.push(95.0);
        let s = BollingerReversion::new(5, 1.0).unwrap();
        let bars = make_bars(&prices);
        let signals = s.signals(&bars);

        assert!(signals[..5].iter().all(|s| *s == Signal::Hold));
        assert_eq!(signals[10], Signal::Buy);
        assert!(s.strength(&bars)[10] > 0.0);
    }

    #[test]
    fn bollinger_upper_band_touch_sells() {
        let mut prices = oscillating(10);
        prices.push(105.0);
        let s = BollingerReversion::new(5, 1.0).unwrap();
        assert_eq!(s.signals(&make_bars(&prices))[10], Signal::Sell);
    }

    #[test]
    fn bollinger_flat_series_touches_both_bands() {
        // zero-width bands: close equals both, lower band checked first
        let s = BollingerReversion::new(5, 2.0).unwrap();
        let bars = make_bars(&[100.0; 8]);
        let signals = s.signals(&bars);
        assert_eq!(signals[5], Signal::Buy);
        assert_eq!(s.strength(&bars)[5], 0.0);
    }
}
