//! Return series helpers and backtest performance metrics.

use super::backtest::{EquityPoint, Trade};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple period-over-period returns. One value shorter than the input.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Compounded return up to each point: `(1 + r).cumprod() - 1`.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth - 1.0
        })
        .collect()
}

/// Annualised Sharpe ratio of daily `returns` against an annual
/// `risk_free_rate`. Zero when there is no dispersion to divide by.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();
    if stddev == 0.0 || !stddev.is_finite() {
        return 0.0;
    }

    let excess = mean - risk_free_rate / TRADING_DAYS_PER_YEAR;
    TRADING_DAYS_PER_YEAR.sqrt() * excess / stddev
}

/// Largest peak-to-trough fall of `1 + cumulative`, in percent.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for c in cumulative {
        let wealth = 1.0 + c;
        peak = peak.max(wealth);
        if peak > 0.0 {
            worst = worst.min((wealth - peak) / peak);
        }
    }

    worst.abs() * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    /// Fraction of closed trades with a positive return.
    pub win_rate: f64,
    pub avg_win: f64,
    /// Mean losing return, reported as a positive magnitude.
    pub avg_loss: f64,
    pub profit_loss_ratio: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_duration: f64,
    pub sharpe_ratio: f64,
    /// Percent.
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
    /// Compounded return of the equity curve.
    pub equity_return: f64,
    pub annualized_return: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade], equity_curve: &[EquityPoint], risk_free_rate: f64) -> Self {
        let equity: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let returns = daily_returns(&equity);
        let cumulative = cumulative_returns(&returns);

        let equity_return = cumulative.last().copied().unwrap_or(0.0);
        let years = equity.len() as f64 / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && equity_return > -1.0 {
            (1.0 + equity_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in trades {
            let r = trade.trade_return;
            if r > 0.0 {
                trades_won += 1;
                total_wins += r;
                largest_win = largest_win.max(r);
            } else if r < 0.0 {
                trades_lost += 1;
                total_losses += r.abs();
                largest_loss = largest_loss.max(r.abs());
            }
            total_duration_days += (trade.exit_date - trade.entry_date).num_days();
        }

        let total_trades = trades.len();
        let avg = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };
        let avg_win = avg(total_wins, trades_won);
        let avg_loss = avg(total_losses, trades_lost);

        let profit_loss_ratio = if avg_loss > 0.0 {
            avg_win / avg_loss
        } else if avg_win > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Metrics {
            trades_won,
            trades_lost,
            trades_breakeven: total_trades - trades_won - trades_lost,
            win_rate: avg(trades_won as f64, total_trades),
            avg_win,
            avg_loss,
            profit_loss_ratio,
            largest_win,
            largest_loss,
            avg_trade_duration: avg(total_duration_days as f64, total_trades),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            max_drawdown: max_drawdown(&cumulative),
            max_drawdown_duration: drawdown_duration(&equity),
            equity_return,
            annualized_return,
        }
    }
}

/// Longest run of consecutive points spent below a prior peak.
fn drawdown_duration(equity: &[f64]) -> usize {
    let mut peak = f64::NEG_INFINITY;
    let mut current = 0usize;
    let mut longest = 0usize;

    for &value in equity {
        if value >= peak {
            peak = value;
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }

    longest
}
