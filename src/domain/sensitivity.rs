//! Moving-average window sensitivity sweep.

use tracing::debug;

use super::backtest::{BacktestConfig, run_backtest};
use super::indicator::MaKind;
use super::ohlcv::OhlcvBar;
use super::runner::run_strategy;
use super::strategy::MovingAverageCrossover;

pub const DEFAULT_MA_PAIRS: [(usize, usize); 5] = [(3, 10), (5, 15), (5, 20), (10, 30), (20, 50)];

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub short_window: usize,
    pub long_window: usize,
    /// Sum of closed trade returns, as a fraction.
    pub total_return: f64,
    pub win_rate: f64,
    pub num_trades: usize,
}

impl SweepResult {
    pub fn label(&self) -> String {
        format!("({},{})", self.short_window, self.long_window)
    }
}

/// Backtest a crossover for every `(short, long)` pair. Pairs that fail
/// validation or need more bars than are available are left out.
pub fn ma_parameter_sweep(
    bars: &[OhlcvBar],
    pairs: &[(usize, usize)],
    ma: MaKind,
    config: &BacktestConfig,
) -> Vec<SweepResult> {
    pairs
        .iter()
        .filter_map(|&(short, long)| {
            let strategy = match MovingAverageCrossover::new(short, long, ma) {
                Ok(s) => s,
                Err(e) => {
                    debug!(short, long, error = %e, "skipping pair");
                    return None;
                }
            };
            let run = match run_strategy(&strategy, bars) {
                Ok(r) => r,
                Err(e) => {
                    debug!(short, long, error = %e, "skipping pair");
                    return None;
                }
            };
            let report = run_backtest(&run, config);
            Some(SweepResult {
                short_window: strategy.short_window(),
                long_window: strategy.long_window(),
                total_return: report.total_return,
                win_rate: report.metrics.win_rate,
                num_trades: report.trades.len(),
            })
        })
        .collect()
}
