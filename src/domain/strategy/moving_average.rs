//! Moving-average trend strategies.

use crate::domain::error::QuantError;
use crate::domain::indicator::{IndicatorSeries, MaKind, calculate_ma};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, clamp_unit};

/// Golden cross / death cross between a short and a long moving average.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageCrossover {
    short_window: usize,
    long_window: usize,
    ma: MaKind,
}

impl MovingAverageCrossover {
    pub fn new(short_window: usize, long_window: usize, ma: MaKind) -> Result<Self, QuantError> {
        let name = format!("MovingAverage({},{},{})", short_window, long_window, ma);
        if short_window == 0 || long_window == 0 {
            return Err(QuantError::invalid_parameter(&name, "moving average windows must be greater than 0"));
        }
        if short_window >= long_window {
            return Err(QuantError::invalid_parameter(&name, "short_window must be less than long_window"));
        }
        Ok(Self {
            short_window,
            long_window,
            ma,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    fn averages(&self, bars: &[OhlcvBar]) -> (IndicatorSeries, IndicatorSeries) {
        (
            calculate_ma(bars, self.short_window, self.ma),
            calculate_ma(bars, self.long_window, self.ma),
        )
    }
}

impl Default for MovingAverageCrossover {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            ma: MaKind::Sma,
        }
    }
}

impl Strategy for MovingAverageCrossover {
    fn name(&self) -> String {
        format!(
            "MovingAverage({},{},{})",
            self.short_window, self.long_window, self.ma
        )
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("short_window", self.short_window.to_string()),
            ("long_window", self.long_window.to_string()),
            ("ma_type", self.ma.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.long_window + 1
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let (short, long) = self.averages(bars);

        (0..bars.len())
            .map(|i| {
                if i == 0 {
                    return Signal::Hold;
                }
                let values = (
                    short.simple_at(i - 1),
                    long.simple_at(i - 1),
                    short.simple_at(i),
                    long.simple_at(i),
                );
                match values {
                    (Some(prev_s), Some(prev_l), Some(s), Some(l)) => {
                        if prev_s <= prev_l && s > l {
                            Signal::Buy
                        } else if prev_s >= prev_l && s < l {
                            Signal::Sell
                        } else {
                            Signal::Hold
                        }
                    }
                    _ => Signal::Hold,
                }
            })
            .collect()
    }

    fn strength(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        let (short, long) = self.averages(bars);

        (0..bars.len())
            .map(|i| match (short.simple_at(i), long.simple_at(i)) {
                (Some(s), Some(l)) if l != 0.0 => clamp_unit((s - l) / l * 10.0),
                _ => 0.0,
            })
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        let (short, long) = self.averages(bars);
        vec![short, long]
    }
}

/// Trend read from the ordering of several moving averages.
///
/// Bullish when every shorter average sits at or above the next longer one,
/// bearish when every shorter one sits at or below it.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMaAlignment {
    windows: Vec<usize>,
    ma: MaKind,
}

impl MultiMaAlignment {
    pub fn new(mut windows: Vec<usize>, ma: MaKind) -> Result<Self, QuantError> {
        windows.sort_unstable();
        let name = Self::format_name(&windows, ma);
        if windows.len() < 2 {
            return Err(QuantError::invalid_parameter(&name, "at least two moving averages are required"));
        }
        if windows.contains(&0) {
            return Err(QuantError::invalid_parameter(&name, "all windows must be greater than 0"));
        }
        Ok(Self { windows, ma })
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    fn format_name(windows: &[usize], ma: MaKind) -> String {
        let joined: Vec<String> = windows.iter().map(|w| w.to_string()).collect();
        format!("MultiMA({},{})", joined.join(","), ma)
    }
}

impl Default for MultiMaAlignment {
    fn default() -> Self {
        Self {
            windows: vec![5, 10, 20],
            ma: MaKind::Sma,
        }
    }
}

impl Strategy for MultiMaAlignment {
    fn name(&self) -> String {
        Self::format_name(&self.windows, self.ma)
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        let joined: Vec<String> = self.windows.iter().map(|w| w.to_string()).collect();
        vec![
            ("windows", joined.join(",")),
            ("ma_type", self.ma.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.windows.last().copied().unwrap_or(0)
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let series = self.indicators(bars);

        (0..bars.len())
            .map(|i| {
                let current: Option<Vec<f64>> = series.iter().map(|s| s.simple_at(i)).collect();
                let Some(values) = current else {
                    return Signal::Hold;
                };
                if values.windows(2).all(|w| w[0] >= w[1]) {
                    Signal::Buy
                } else if values.windows(2).all(|w| w[0] <= w[1]) {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        self.windows
            .iter()
            .map(|&w| calculate_ma(bars, w, self.ma))
            .collect()
    }
}
