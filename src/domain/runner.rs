//! Walks a strategy over a price series, tracking position and unrealised PnL.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::QuantError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{PositionSide, Signal};
use crate::domain::strategy::Strategy;

/// Per-bar output of a strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub strength: f64,
    pub position: PositionSide,
    pub unrealized_pnl_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionChange {
    pub date: NaiveDate,
    pub from: PositionSide,
    pub to: PositionSide,
    pub price: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub strategy_name: String,
    pub symbol: String,
    pub parameters: Vec<(&'static str, String)>,
    pub rows: Vec<SignalRow>,
    pub position_changes: Vec<PositionChange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyStats {
    pub strategy_name: String,
    pub total_signals: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub hold_signals: usize,
    pub position_changes: usize,
    /// Percent of bars that were BUY.
    pub buy_signal_rate: f64,
    /// Percent of bars that were SELL.
    pub sell_signal_rate: f64,
    pub current_position: PositionSide,
    pub parameters: Vec<(&'static str, String)>,
}

/// Open position bookkeeping while walking the signals.
#[derive(Debug, Clone, Copy, Default)]
struct Tracker {
    side: PositionSide,
    entry_price: f64,
}

impl Tracker {
    fn update(&mut self, signal: Signal, price: f64) -> Option<(PositionSide, PositionSide)> {
        let next = self.side.apply(signal);
        if next == self.side {
            return None;
        }
        let from = self.side;
        self.side = next;
        self.entry_price = price;
        Some((from, next))
    }

    fn unrealized_pnl_pct(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        match self.side {
            PositionSide::Long => (price - self.entry_price) / self.entry_price * 100.0,
            PositionSide::Short => (self.entry_price - price) / self.entry_price * 100.0,
            PositionSide::Flat => 0.0,
        }
    }
}

/// Run `strategy` over `bars` (oldest first).
///
/// Input shorter than `strategy.min_bars()` is rejected before any
/// indicator is computed.
pub fn run_strategy(strategy: &dyn Strategy, bars: &[OhlcvBar]) -> Result<StrategyRun, QuantError> {
    let symbol = bars.first().map(|b| b.symbol.clone()).unwrap_or_default();
    let minimum = strategy.min_bars();
    if bars.len() < minimum {
        return Err(QuantError::InsufficientData {
            symbol,
            bars: bars.len(),
            minimum,
        });
    }

    let signals = strategy.signals(bars);
    let strength = strategy.strength(bars);

    let mut tracker = Tracker::default();
    let mut rows = Vec::with_capacity(bars.len());
    let mut position_changes = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let signal = signals.get(i).copied().unwrap_or_default();

        if let Some((from, to)) = tracker.update(signal, bar.close) {
            debug!(date = %bar.date, %from, %to, price = bar.close, "position change");
            position_changes.push(PositionChange {
                date: bar.date,
                from,
                to,
                price: bar.close,
                signal,
            });
        }

        rows.push(SignalRow {
            date: bar.date,
            close: bar.close,
            signal,
            strength: strength.get(i).copied().unwrap_or(0.0),
            position: tracker.side,
            unrealized_pnl_pct: tracker.unrealized_pnl_pct(bar.close),
        });
    }

    Ok(StrategyRun {
        strategy_name: strategy.name(),
        symbol,
        parameters: strategy.parameters(),
        rows,
        position_changes,
    })
}

impl StrategyRun {
    pub fn stats(&self) -> StrategyStats {
        let total_signals = self.rows.len();
        let count = |wanted: Signal| self.rows.iter().filter(|r| r.signal == wanted).count();
        let buy_signals = count(Signal::Buy);
        let sell_signals = count(Signal::Sell);
        let rate = |n: usize| {
            if total_signals > 0 {
                n as f64 / total_signals as f64 * 100.0
            } else {
                0.0
            }
        };

        StrategyStats {
            strategy_name: self.strategy_name.clone(),
            total_signals,
            buy_signals,
            sell_signals,
            hold_signals: total_signals - buy_signals - sell_signals,
            position_changes: self.position_changes.len(),
            buy_signal_rate: rate(buy_signals),
            sell_signal_rate: rate(sell_signals),
            current_position: self
                .rows
                .last()
                .map(|r| r.position)
                .unwrap_or_default(),
            parameters: self.parameters.clone(),
        }
    }

    /// Rows carrying a BUY or SELL, in date order.
    pub fn actionable(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter().filter(|r| r.signal != Signal::Hold)
    }
}
