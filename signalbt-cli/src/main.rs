//! signalbt CLI — batch backtests of the DMI/MACD rule over a ticker universe.
//!
//! Commands:
//! - `run` — backtest every ticker in the universe file, print the summary,
//!   and write per-ticker ledgers and signal tapes
//! - `inspect` — backtest one symbol and print its transaction journal
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use signalbt_runner::{
    load_tickers, run_batch, run_symbol, save_artifacts, save_summary, AssetOutcome,
    AssetReport, BacktestConfig, BatchSummary,
};

#[derive(Parser)]
#[command(
    name = "signalbt",
    about = "signalbt — DMI/MACD signal backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every ticker in the universe file.
    Run {
        #[command(flatten)]
        overrides: ConfigArgs,

        /// Ticker universe CSV (needs a `Ticker` column).
        #[arg(long)]
        tickers: Option<PathBuf>,

        /// Skip writing ledger and signal files.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Backtest a single symbol and print its journal.
    Inspect {
        #[command(flatten)]
        overrides: ConfigArgs,

        /// Symbol to run (reads `<data-dir>/<SYMBOL>.csv`).
        #[arg(long)]
        symbol: String,
    },
}

/// Settings shared by every command; flags override the config file.
#[derive(Args)]
struct ConfigArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `<SYMBOL>.csv` bar files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for ledgers, signal tapes and summary.json.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Start date, inclusive (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date, exclusive (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Starting cash per ticker.
    #[arg(long)]
    initial_cash: Option<f64>,
}

impl ConfigArgs {
    fn resolve(self) -> Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => BacktestConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BacktestConfig::default(),
        };

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(start) = self.start {
            config.start_date = start;
        }
        if let Some(end) = self.end {
            config.end_date = end;
        }
        if let Some(cash) = self.initial_cash {
            config.initial_cash = cash;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            overrides,
            tickers,
            no_artifacts,
        } => run_cmd(overrides, tickers, no_artifacts),
        Commands::Inspect { overrides, symbol } => inspect_cmd(overrides, &symbol),
    }
}

fn run_cmd(overrides: ConfigArgs, tickers: Option<PathBuf>, no_artifacts: bool) -> Result<()> {
    let mut config = overrides.resolve()?;
    if let Some(path) = tickers {
        config.tickers_file = path;
    }

    let symbols = load_tickers(&config.tickers_file)?;
    info!(
        tickers = symbols.len(),
        start = %config.start_date,
        end = %config.end_date,
        "starting batch"
    );

    let outcomes = run_batch(&symbols, &config);
    let summary = BatchSummary::from_outcomes(&outcomes, config.initial_cash);

    if !no_artifacts {
        for report in outcomes.iter().filter_map(AssetOutcome::report) {
            save_artifacts(report, &config.output_dir)?;
        }
        let path = save_summary(&summary, &config.output_dir)?;
        info!(dir = %config.output_dir.display(), summary = %path.display(), "artifacts saved");
    }

    print_summary(&summary);
    Ok(())
}

fn inspect_cmd(overrides: ConfigArgs, symbol: &str) -> Result<()> {
    let config = overrides.resolve()?;
    let report = run_symbol(symbol, &config)?;
    print_report(&report);
    Ok(())
}

fn format_percent(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.2}%")
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("Total Portfolio Value: {:.2}", summary.total_portfolio_value);
    println!(
        "Total Return: {}",
        format_percent(summary.total_return_percent)
    );
    println!("Total Trades: {}", summary.total_trades());
    println!("Successful Trades (%): {:.2}%", summary.success_rate);
    for asset in &summary.per_asset {
        println!(
            "{} Return: {}",
            asset.symbol,
            format_percent(asset.return_percent)
        );
    }
    for skipped in &summary.skipped {
        println!("{} skipped: {}", skipped.symbol, skipped.reason);
    }
}

fn print_report(report: &AssetReport) {
    let result = &report.result;
    println!();
    println!("=== {} ===", report.symbol);
    println!(
        "Period:         {} to {} ({} bars)",
        report.first_date, report.last_date, report.bar_count
    );
    match result.start_index {
        Some(i) => println!("Start index:    {i}"),
        None => println!("Start index:    none (insufficient data)"),
    }
    println!("Dataset hash:   {}", report.dataset_hash);
    println!();
    println!(
        "{:<12} {:<5} {:>12} {:>10} {:>14} {:>16}",
        "Date", "Action", "Price", "Quantity", "Cash", "Portfolio_Value"
    );
    for t in &result.transactions {
        println!(
            "{:<12} {:<5} {:>12.4} {:>10} {:>14.2} {:>16.2}",
            t.date.to_string(),
            t.action.to_string(),
            t.price,
            t.quantity,
            t.cash,
            t.portfolio_value
        );
    }
    println!();
    println!("Trades:         {}", result.total_trades());
    println!("Successful:     {}", result.successful_trades());
    println!("Final value:    {:.2}", report.final_portfolio_value);
    println!("Return:         {}", format_percent(report.stock_return_percent));
    if result.has_open_position() {
        println!(
            "Open position:  {} shares, marked at {:.2}",
            result.final_quantity,
            result.final_portfolio_value()
        );
    }
    for warn in &result.warnings {
        println!("WARNING: {warn}");
    }
}
