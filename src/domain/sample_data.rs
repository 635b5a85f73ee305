//! Deterministic synthetic price series for demos and tests.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ohlcv::OhlcvBar;

const MAX_DAILY_MOVE: f64 = 0.03;
const MIN_PRICE: f64 = 0.01;

/// Generate `days` weekday bars starting at `start` (rolled forward past a
/// weekend). Closes follow a uniform ±3 % random walk from `start_price`;
/// the same seed always yields the same series.
pub fn generate_bars(
    symbol: &str,
    start: NaiveDate,
    days: usize,
    start_price: f64,
    seed: u64,
) -> Vec<OhlcvBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(days);
    let mut date = start;
    let mut close = start_price;

    while bars.len() < days {
        if is_weekend(date) {
            date = date.succ_opt().unwrap_or(date);
            continue;
        }

        if !bars.is_empty() {
            close *= 1.0 + rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE);
        }
        let close_r = round_cents(close);
        let open = round_cents(close * rng.gen_range(0.995..1.005));
        let high = round_cents(open.max(close_r) * rng.gen_range(1.0..1.02));
        let low = round_cents(open.min(close_r) * rng.gen_range(0.98..1.0));

        bars.push(OhlcvBar {
            symbol: symbol.to_string(),
            date,
            open,
            high,
            low,
            close: close_r,
            volume: rng.gen_range(1_000_000..10_000_000),
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    bars
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Round to cents, never below one cent.
fn round_cents(x: f64) -> f64 {
    ((x * 100.0).round() / 100.0).max(MIN_PRICE)
}
