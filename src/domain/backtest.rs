//! Long-only round-trip backtest over a strategy run.
//!
//! A BUY opens a fully invested position at the bar's close when flat and a
//! SELL closes it. Commission is charged as a percentage of traded value on
//! both legs, and the equity curve is marked to market on every bar.

use chrono::NaiveDate;
use tracing::debug;

use super::metrics::Metrics;
use super::runner::StrategyRun;
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Percent of traded value, charged on entry and exit.
    pub commission_pct: f64,
    /// Annual rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission_pct: 0.0,
            risk_free_rate: 0.02,
        }
    }
}

/// A closed round trip. `trade_return` is a fraction, net of commission.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub trade_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenTrade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub last_price: f64,
    /// Marked at the last close, entry commission included.
    pub unrealized_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub strategy_name: String,
    pub symbol: String,
    pub trades: Vec<Trade>,
    pub open_trade: Option<OpenTrade>,
    pub equity_curve: Vec<EquityPoint>,
    pub final_equity: f64,
    pub buy_hold_return: f64,
    /// Sum of closed trade returns.
    pub total_return: f64,
    pub excess_return: f64,
    pub metrics: Metrics,
}

struct Holding {
    entry_date: NaiveDate,
    entry_price: f64,
    shares: f64,
}

pub fn run_backtest(run: &StrategyRun, config: &BacktestConfig) -> BacktestReport {
    let fee = config.commission_pct / 100.0;
    let mut cash = config.initial_capital;
    let mut holding: Option<Holding> = None;
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(run.rows.len());

    for row in &run.rows {
        match row.signal {
            Signal::Buy if holding.is_none() => {
                let shares = if row.close > 0.0 {
                    cash * (1.0 - fee) / row.close
                } else {
                    0.0
                };
                holding = Some(Holding {
                    entry_date: row.date,
                    entry_price: row.close,
                    shares,
                });
                cash = 0.0;
            }
            Signal::Sell => {
                if let Some(open) = holding.take() {
                    cash = open.shares * row.close * (1.0 - fee);
                    let trade = Trade {
                        entry_date: open.entry_date,
                        exit_date: row.date,
                        entry_price: open.entry_price,
                        exit_price: row.close,
                        trade_return: round_trip_return(open.entry_price, row.close, fee),
                    };
                    debug!(
                        entry = %trade.entry_date,
                        exit = %trade.exit_date,
                        trade_return = trade.trade_return,
                        "closed trade"
                    );
                    trades.push(trade);
                }
            }
            _ => {}
        }

        let equity = match &holding {
            Some(open) => open.shares * row.close,
            None => cash,
        };
        equity_curve.push(EquityPoint {
            date: row.date,
            equity,
        });
    }

    let open_trade = match (holding, run.rows.last()) {
        (Some(open), Some(last)) => Some(OpenTrade {
            entry_date: open.entry_date,
            entry_price: open.entry_price,
            last_price: last.close,
            unrealized_return: if open.entry_price > 0.0 {
                last.close / open.entry_price * (1.0 - fee) - 1.0
            } else {
                0.0
            },
        }),
        _ => None,
    };

    let buy_hold_return = match (run.rows.first(), run.rows.last()) {
        (Some(first), Some(last)) if first.close != 0.0 => (last.close - first.close) / first.close,
        _ => 0.0,
    };
    let total_return: f64 = trades.iter().map(|t| t.trade_return).sum();
    let metrics = Metrics::compute(&trades, &equity_curve, config.risk_free_rate);
    let final_equity = equity_curve
        .last()
        .map(|p| p.equity)
        .unwrap_or(config.initial_capital);

    BacktestReport {
        strategy_name: run.strategy_name.clone(),
        symbol: run.symbol.clone(),
        trades,
        open_trade,
        equity_curve,
        final_equity,
        buy_hold_return,
        total_return,
        excess_return: total_return - buy_hold_return,
        metrics,
    }
}

fn round_trip_return(entry: f64, exit: f64, fee: f64) -> f64 {
    if entry <= 0.0 {
        return 0.0;
    }
    exit / entry * (1.0 - fee) * (1.0 - fee) - 1.0
}
