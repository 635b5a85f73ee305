//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestReport, run_backtest};
use crate::domain::config_validation::{
    build_backtest_config, data_date_range, validate_backtest_config, validate_config,
};
use crate::domain::error::QuantError;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue, MaKind};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::runner::{StrategyRun, run_strategy};
use crate::domain::sample_data::generate_bars;
use crate::domain::sensitivity::{DEFAULT_MA_PAIRS, SweepResult, ma_parameter_sweep};
use crate::domain::strategy::{
    BollingerReversion, MovingAverageCrossover, MultiMaAlignment, RsiDivergence, RsiThreshold,
    Strategy, ZScoreMeanReversion,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "quantprimer",
    about = "Technical indicators and BUY/SELL/HOLD signals over daily price files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured strategy and print its signals
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Write the per-bar signal report to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of recent BUY/SELL signals to show
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Backtest the configured strategy against buy-and-hold
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Print the indicator values the configured strategy reads
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Moving average crossover window sensitivity
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols with a price file in the configured data directory
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write a synthetic price file
    Generate {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value_t = 250)]
        days: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,
        /// First date (YYYY-MM-DD), rolled forward past a weekend
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Validate a configuration file and its strategy parameters
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signals {
            config,
            symbol,
            output,
            last,
        } => run_signals(&config, symbol.as_deref(), output.as_deref(), last),
        Command::Backtest { config, symbol } => run_backtest_command(&config, symbol.as_deref()),
        Command::Indicators {
            config,
            symbol,
            last,
        } => run_indicators(&config, symbol.as_deref(), last),
        Command::Sweep { config, symbol } => run_sweep(&config, symbol.as_deref()),
        Command::Symbols { config } => run_symbols(&config),
        Command::Generate {
            symbol,
            dir,
            days,
            seed,
            start_price,
            start,
        } => run_generate(&symbol, dir, days, seed, start_price, start),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, QuantError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::load(path)
}

/// CSV data adapter rooted at `[data] dir`.
pub fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, QuantError> {
    match config.get_string("data", "dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(CsvAdapter::new(PathBuf::from(dir.trim()))),
        _ => Err(QuantError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        }),
    }
}

/// `--symbol` wins over `[data] symbol`. Symbols are upper-cased.
pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Result<String, QuantError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| QuantError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })
}

pub fn build_strategy(config: &dyn ConfigPort) -> Result<Box<dyn Strategy>, QuantError> {
    let kind = config
        .get_string("strategy", "type")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "ma_crossover".to_string());

    let strategy: Box<dyn Strategy> = match kind.as_str() {
        "ma_crossover" => Box::new(MovingAverageCrossover::new(
            get_window(config, "short_window", 5)?,
            get_window(config, "long_window", 20)?,
            get_ma_kind(config)?,
        )?),
        "multi_ma" => Box::new(MultiMaAlignment::new(
            get_window_list(config, "windows", &[5, 10, 20])?,
            get_ma_kind(config)?,
        )?),
        "rsi" => Box::new(RsiThreshold::new(
            get_window(config, "rsi_window", 14)?,
            config.get_double("strategy", "oversold", 30.0)?,
            config.get_double("strategy", "overbought", 70.0)?,
        )?),
        "rsi_divergence" => Box::new(RsiDivergence::new(
            get_window(config, "rsi_window", 14)?,
            get_window(config, "lookback", 10)?,
            config.get_double("strategy", "min_rsi_change", 5.0)?,
        )?),
        "mean_reversion" => Box::new(ZScoreMeanReversion::new(
            get_window(config, "window", 20)?,
            config.get_double("strategy", "threshold", 2.0)?,
            get_ma_kind(config)?,
        )?),
        "bollinger" => Box::new(BollingerReversion::new(
            get_window(config, "window", 20)?,
            config.get_double("strategy", "std_multiplier", 2.0)?,
        )?),
        other => {
            return Err(QuantError::ConfigInvalid {
                section: "strategy".into(),
                key: "type".into(),
                reason: format!(
                    "unknown strategy type '{other}' (expected ma_crossover, multi_ma, rsi, rsi_divergence, mean_reversion or bollinger)"
                ),
            });
        }
    };

    info!(strategy = %strategy.name(), "built strategy");
    Ok(strategy)
}

fn get_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, QuantError> {
    let value = config.get_int("strategy", key, default as i64)?;
    usize::try_from(value).map_err(|_| QuantError::ConfigInvalid {
        section: "strategy".into(),
        key: key.into(),
        reason: format!("{key} must be non-negative, got {value}"),
    })
}

fn get_window_list(config: &dyn ConfigPort, key: &str, default: &[usize]) -> Result<Vec<usize>, QuantError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(default.to_vec());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| QuantError::ConfigInvalid {
                section: "strategy".into(),
                key: key.into(),
                reason: format!("'{s}' is not a window length"),
            })
        })
        .collect()
}

fn get_ma_kind(config: &dyn ConfigPort) -> Result<MaKind, QuantError> {
    match config.get_string("strategy", "ma_type") {
        None => Ok(MaKind::default()),
        Some(raw) => raw.parse().map_err(|reason| QuantError::ConfigInvalid {
            section: "strategy".into(),
            key: "ma_type".into(),
            reason,
        }),
    }
}

pub fn load_bars(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol: &str,
) -> Result<Vec<OhlcvBar>, QuantError> {
    let (start, end) = data_date_range(config)?;
    let bars = data.fetch_bars(symbol, start, end)?;
    info!(
        symbol,
        bars = bars.len(),
        first = %bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
        last = %bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
        "loaded bars"
    );
    Ok(bars)
}

pub fn run_signals_pipeline(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<StrategyRun, QuantError> {
    let strategy = build_strategy(config)?;
    let symbol = resolve_symbol(symbol_override, config)?;
    let bars = load_bars(config, data, &symbol)?;
    let run = run_strategy(strategy.as_ref(), &bars)?;
    let stats = run.stats();
    info!(
        strategy = %stats.strategy_name,
        buys = stats.buy_signals,
        sells = stats.sell_signals,
        position_changes = stats.position_changes,
        "strategy run complete"
    );
    Ok(run)
}

pub fn run_backtest_pipeline(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<BacktestReport, QuantError> {
    validate_backtest_config(config)?;
    let bt_config = build_backtest_config(config)?;
    let run = run_signals_pipeline(config, data, symbol_override)?;
    let report = run_backtest(&run, &bt_config);
    info!(
        trades = report.trades.len(),
        total_return = report.total_return,
        buy_hold_return = report.buy_hold_return,
        "backtest complete"
    );
    Ok(report)
}

pub fn run_indicators_pipeline(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<(Vec<OhlcvBar>, Vec<IndicatorSeries>), QuantError> {
    let strategy = build_strategy(config)?;
    let symbol = resolve_symbol(symbol_override, config)?;
    let bars = load_bars(config, data, &symbol)?;
    let series = strategy.indicators(&bars);
    Ok((bars, series))
}

pub fn run_sweep_pipeline(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<Vec<SweepResult>, QuantError> {
    validate_backtest_config(config)?;
    let symbol = resolve_symbol(symbol_override, config)?;
    let bars = load_bars(config, data, &symbol)?;
    let results = ma_parameter_sweep(
        &bars,
        &DEFAULT_MA_PAIRS,
        get_ma_kind(config)?,
        &build_backtest_config(config)?,
    );
    if results.is_empty() {
        return Err(QuantError::InsufficientData {
            symbol,
            bars: bars.len(),
            minimum: DEFAULT_MA_PAIRS
                .iter()
                .map(|&(_, long)| long + 1)
                .min()
                .unwrap_or(0),
        });
    }
    Ok(results)
}

fn run_signals(
    config_path: &Path,
    symbol: Option<&str>,
    output: Option<&Path>,
    last: usize,
) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config)?;
    let run = run_signals_pipeline(&config, &data, symbol)?;
    print_run(&run, last);

    if let Some(path) = output {
        CsvReportAdapter::new().write(&run, path)?;
        println!("\nSignal report written to: {}", path.display());
    }
    Ok(())
}

fn run_backtest_command(config_path: &Path, symbol: Option<&str>) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config)?;
    let report = run_backtest_pipeline(&config, &data, symbol)?;
    print_backtest(&report);
    Ok(())
}

fn run_indicators(config_path: &Path, symbol: Option<&str>, last: usize) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config)?;
    let (bars, series) = run_indicators_pipeline(&config, &data, symbol)?;
    print_indicators(&bars, &series, last);
    Ok(())
}

fn run_sweep(config_path: &Path, symbol: Option<&str>) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config)?;
    let results = run_sweep_pipeline(&config, &data, symbol)?;
    print_sweep(&results);
    Ok(())
}

fn run_symbols(config_path: &Path) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config)?;
    let symbols = data.list_symbols()?;
    if symbols.is_empty() {
        warn!("no price files found");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    Ok(())
}

fn run_generate(
    symbol: &str,
    dir: PathBuf,
    days: usize,
    seed: u64,
    start_price: f64,
    start: Option<NaiveDate>,
) -> Result<(), QuantError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(QuantError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        });
    }
    if start_price.is_nan() || start_price <= 0.0 {
        return Err(QuantError::invalid_parameter(
            "generate",
            format!("start price must be positive, got {start_price}"),
        ));
    }

    let start = start
        .or_else(|| NaiveDate::from_ymd_opt(2023, 1, 2))
        .unwrap_or_default();
    let bars = generate_bars(&symbol, start, days, start_price, seed);
    if bars.is_empty() {
        warn!(symbol = %symbol, "no bars generated");
    }
    let path = CsvAdapter::new(dir).write_bars(&symbol, &bars)?;
    println!("Wrote {} bars for {} to {}", bars.len(), symbol, path.display());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), QuantError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let strategy = build_strategy(&config)?;

    println!("Strategy:   {}", strategy.name());
    for (key, value) in strategy.parameters() {
        println!("  {key:<16} {value}");
    }
    println!("Min bars:   {}", strategy.min_bars());
    println!("Indicators:");
    for series in strategy.indicators(&[]) {
        println!("  {}", series.indicator_type);
    }
    println!("\nConfiguration is valid.");
    Ok(())
}

fn print_run(run: &StrategyRun, last: usize) {
    let stats = run.stats();
    println!("=== {} on {} ===", stats.strategy_name, run.symbol);
    for (key, value) in &stats.parameters {
        println!("  {key:<16} {value}");
    }
    println!("Bars:             {}", stats.total_signals);
    println!(
        "BUY / SELL / HOLD: {} / {} / {}",
        stats.buy_signals, stats.sell_signals, stats.hold_signals
    );
    println!("BUY rate:         {:.1}%", stats.buy_signal_rate);
    println!("SELL rate:        {:.1}%", stats.sell_signal_rate);
    println!("Position changes: {}", stats.position_changes);
    println!("Current position: {}", stats.current_position);

    let actionable: Vec<_> = run.actionable().collect();
    if actionable.is_empty() {
        println!("\nNo BUY/SELL signals.");
        return;
    }

    let shown = &actionable[actionable.len().saturating_sub(last)..];
    println!("\nRecent signals ({} of {}):", shown.len(), actionable.len());
    println!("date       |    close | signal | strength | position | unrealized");
    println!("{}", "-".repeat(68));
    for row in shown {
        println!(
            "{} | {:8.2} | {:<6} | {:+8.3} | {:<8} | {:+9.2}%",
            row.date, row.close, row.signal, row.strength, row.position, row.unrealized_pnl_pct
        );
    }
}

fn print_backtest(report: &BacktestReport) {
    let m = &report.metrics;
    println!("=== Backtest: {} on {} ===", report.strategy_name, report.symbol);
    if let (Some(first), Some(last)) = (report.equity_curve.first(), report.equity_curve.last()) {
        println!("Period:           {} to {}", first.date, last.date);
    }
    println!("Closed trades:    {}", report.trades.len());
    println!("Strategy return:  {:+.2}%", report.total_return * 100.0);
    println!("Buy & hold:       {:+.2}%", report.buy_hold_return * 100.0);
    println!("Excess return:    {:+.2}%", report.excess_return * 100.0);
    println!("Final equity:     {:.2}", report.final_equity);
    println!("Equity return:    {:+.2}%", m.equity_return * 100.0);
    println!("Win rate:         {:.1}%", m.win_rate * 100.0);
    println!("Average win:      {:.2}%", m.avg_win * 100.0);
    println!("Average loss:     {:.2}%", m.avg_loss * 100.0);
    if m.profit_loss_ratio.is_finite() {
        println!("Profit/loss:      {:.2}", m.profit_loss_ratio);
    } else {
        println!("Profit/loss:      n/a (no losing trades)");
    }
    println!("Sharpe ratio:     {:.2}", m.sharpe_ratio);
    println!("Max drawdown:     -{:.1}%", m.max_drawdown);

    if !report.trades.is_empty() {
        let shown = report.trades.len().min(10);
        println!("\nTrades (first {shown}):");
        println!("entry      |    price | exit       |    price |  return");
        println!("{}", "-".repeat(57));
        for t in &report.trades[..shown] {
            println!(
                "{} | {:8.2} | {} | {:8.2} | {:+6.2}%",
                t.entry_date,
                t.entry_price,
                t.exit_date,
                t.exit_price,
                t.trade_return * 100.0
            );
        }
    }

    if let Some(open) = &report.open_trade {
        println!(
            "\nOpen trade: entered {} at {:.2}, last {:.2} ({:+.2}%)",
            open.entry_date,
            open.entry_price,
            open.last_price,
            open.unrealized_return * 100.0
        );
    }
}

fn print_indicators(bars: &[OhlcvBar], series: &[IndicatorSeries], last: usize) {
    let start = bars.len().saturating_sub(last);
    let mut header = format!("{:<10} | {:>8}", "date", "close");
    for s in series {
        header.push_str(&format!(" | {:>24}", s.indicator_type.to_string()));
    }
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for (i, bar) in bars.iter().enumerate().skip(start) {
        let mut line = format!("{} | {:8.2}", bar.date, bar.close);
        for s in series {
            let cell = match s.values.get(i) {
                Some(p) if p.valid => match p.value {
                    IndicatorValue::Simple(v) => format!("{v:.4}"),
                    IndicatorValue::Bollinger { upper, middle, lower } => {
                        format!("{upper:.2}/{middle:.2}/{lower:.2}")
                    }
                },
                _ => "-".to_string(),
            };
            line.push_str(&format!(" | {cell:>24}"));
        }
        println!("{line}");
    }
}

fn print_sweep(results: &[SweepResult]) {
    println!("params   | total return | win rate | trades");
    println!("{}", "-".repeat(44));
    for r in results {
        println!(
            "{:<8} | {:+11.2}% | {:7.1}% | {:6}",
            r.label(),
            r.total_return * 100.0,
            r.win_rate * 100.0,
            r.num_trades
        );
    }
}
