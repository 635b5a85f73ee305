//! RSI-based strategies: overbought/oversold thresholds and divergence.

use crate::domain::error::QuantError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, clamp_unit};

/// BUY at or below the oversold threshold, SELL at or above overbought.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiThreshold {
    window: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiThreshold {
    pub fn new(window: usize, oversold: f64, overbought: f64) -> Result<Self, QuantError> {
        let name = format!("RSI({},{},{})", window, oversold, overbought);
        if window == 0 {
            return Err(QuantError::invalid_parameter(&name, "rsi_window must be greater than 0"));
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(oversold) || !in_range(overbought) {
            return Err(QuantError::invalid_parameter(&name, "RSI thresholds must be between 0 and 100"));
        }
        if oversold >= overbought {
            return Err(QuantError::invalid_parameter(&name, "oversold threshold must be below overbought threshold"));
        }
        Ok(Self {
            window,
            oversold,
            overbought,
        })
    }

    fn classify(&self, rsi: f64) -> Signal {
        if rsi <= self.oversold {
            Signal::Buy
        } else if rsi >= self.overbought {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn intensity(&self, rsi: f64) -> f64 {
        let raw = if rsi <= self.oversold {
            if self.oversold > 0.0 {
                (self.oversold - rsi) / self.oversold
            } else {
                1.0
            }
        } else if rsi >= self.overbought {
            if self.overbought < 100.0 {
                -(rsi - self.overbought) / (100.0 - self.overbought)
            } else {
                -1.0
            }
        } else {
            (50.0 - rsi) / 50.0
        };
        clamp_unit(raw)
    }
}

impl Default for RsiThreshold {
    fn default() -> Self {
        Self {
            window: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl Strategy for RsiThreshold {
    fn name(&self) -> String {
        format!("RSI({},{},{})", self.window, self.oversold, self.overbought)
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("rsi_window", self.window.to_string()),
            ("oversold", self.oversold.to_string()),
            ("overbought", self.overbought.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.window + 1
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let rsi = calculate_rsi(bars, self.window);
        (0..bars.len())
            .map(|i| rsi.simple_at(i).map_or(Signal::Hold, |v| self.classify(v)))
            .collect()
    }

    fn strength(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        let rsi = calculate_rsi(bars, self.window);
        (0..bars.len())
            .map(|i| rsi.simple_at(i).map_or(0.0, |v| self.intensity(v)))
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        vec![calculate_rsi(bars, self.window)]
    }
}

/// Price and RSI moving in opposite directions over a lookback.
///
/// Bullish divergence (price down, RSI up by more than `min_rsi_change`)
/// emits BUY; bearish divergence emits SELL.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiDivergence {
    window: usize,
    lookback: usize,
    min_rsi_change: f64,
}

impl RsiDivergence {
    pub fn new(window: usize, lookback: usize, min_rsi_change: f64) -> Result<Self, QuantError> {
        let name = format!("RSI_Divergence({},{},{})", window, lookback, min_rsi_change);
        if window == 0 || lookback == 0 {
            return Err(QuantError::invalid_parameter(&name, "rsi_window and lookback must be greater than 0"));
        }
        if !min_rsi_change.is_finite() || min_rsi_change < 0.0 {
            return Err(QuantError::invalid_parameter(&name, "min_rsi_change must be a non-negative number"));
        }
        Ok(Self {
            window,
            lookback,
            min_rsi_change,
        })
    }
}

impl Default for RsiDivergence {
    fn default() -> Self {
        Self {
            window: 14,
            lookback: 10,
            min_rsi_change: 5.0,
        }
    }
}

impl Strategy for RsiDivergence {
    fn name(&self) -> String {
        format!(
            "RSI_Divergence({},{},{})",
            self.window, self.lookback, self.min_rsi_change
        )
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("rsi_window", self.window.to_string()),
            ("lookback", self.lookback.to_string()),
            ("min_rsi_change", self.min_rsi_change.to_string()),
        ]
    }

    fn min_bars(&self) -> usize {
        self.window + self.lookback + 1
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<Signal> {
        let rsi = calculate_rsi(bars, self.window);

        (0..bars.len())
            .map(|i| {
                if i < self.window + self.lookback {
                    return Signal::Hold;
                }
                let first = i + 1 - self.lookback;
                let (Some(rsi_first), Some(rsi_last)) = (rsi.simple_at(first), rsi.simple_at(i))
                else {
                    return Signal::Hold;
                };
                let price_change = bars[i].close - bars[first].close;
                let rsi_change = rsi_last - rsi_first;

                if price_change < 0.0 && rsi_change > self.min_rsi_change {
                    Signal::Buy
                } else if price_change > 0.0 && rsi_change < -self.min_rsi_change {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn indicators(&self, bars: &[OhlcvBar]) -> Vec<IndicatorSeries> {
        vec![calculate_rsi(bars, self.window)]
    }
}
