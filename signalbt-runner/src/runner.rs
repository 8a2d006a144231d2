//! Batch runner — wires data loading, indicator frames, and the engine.
//!
//! Entry points:
//! - `run_asset()`: pre-loaded bars in, report out. No I/O.
//! - `run_symbol()`: loads the symbol's bar file, then runs.
//! - `run_batch()`: fans `run_symbol()` out over a universe with rayon.
//!   A failing asset becomes a `Skipped` outcome and never aborts its siblings.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use signalbt_core::domain::Bar;
use signalbt_core::engine::{run_simulation, FrameError, IndicatorFrame, RunResult};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{dataset_hash, load_bars, LoadError};
use crate::summary::stock_return_percent;

/// Errors from a single asset run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("indicator frame error for '{symbol}': {source}")]
    Frame { symbol: String, source: FrameError },
    #[error("no bars supplied for '{0}'")]
    NoBars(String),
}

/// Everything produced by one asset's run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReport {
    pub symbol: String,
    pub result: RunResult,
    /// Return against the opening buy's notional; NaN without transactions.
    pub stock_return_percent: f64,
    /// Value of the last journal entry, or the untouched cash when nothing traded.
    pub final_portfolio_value: f64,
    pub dataset_hash: String,
    pub bar_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Per-asset result of a batch: a report, or the reason there is none.
#[derive(Debug, Clone)]
pub enum AssetOutcome {
    Completed(Box<AssetReport>),
    Skipped { symbol: String, reason: String },
}

impl AssetOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            AssetOutcome::Completed(report) => &report.symbol,
            AssetOutcome::Skipped { symbol, .. } => symbol,
        }
    }

    pub fn report(&self) -> Option<&AssetReport> {
        match self {
            AssetOutcome::Completed(report) => Some(&**report),
            AssetOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, AssetOutcome::Skipped { .. })
    }
}

/// Run the strategy over pre-loaded bars for one asset.
pub fn run_asset(
    symbol: &str,
    bars: Vec<Bar>,
    config: &BacktestConfig,
) -> Result<AssetReport, RunError> {
    config.validate()?;
    let hash = dataset_hash(&bars);
    run_hashed(symbol, bars, hash, config)
}

/// Load one symbol's bar file and run it.
pub fn run_symbol(symbol: &str, config: &BacktestConfig) -> Result<AssetReport, RunError> {
    config.validate()?;
    let loaded = load_bars(
        &config.bar_file(symbol),
        symbol,
        config.start_date,
        config.end_date,
    )?;
    run_hashed(symbol, loaded.bars, loaded.dataset_hash, config)
}

fn run_hashed(
    symbol: &str,
    bars: Vec<Bar>,
    hash: String,
    config: &BacktestConfig,
) -> Result<AssetReport, RunError> {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Err(RunError::NoBars(symbol.to_string()));
    };
    let (first_date, last_date) = (first.date, last.date);
    let bar_count = bars.len();

    let frame =
        IndicatorFrame::compute(bars, &config.indicators).map_err(|source| RunError::Frame {
            symbol: symbol.to_string(),
            source,
        })?;
    let result = run_simulation(&frame, config.initial_cash);

    for note in &result.warnings {
        warn!(symbol, "{note}");
    }

    let final_portfolio_value = result
        .transactions
        .last()
        .map_or(config.initial_cash, |t| t.portfolio_value);
    let stock_return = stock_return_percent(&result.transactions);

    debug!(
        symbol,
        bars = bar_count,
        transactions = result.transactions.len(),
        trades = result.total_trades(),
        final_value = final_portfolio_value,
        "asset run complete"
    );

    Ok(AssetReport {
        symbol: symbol.to_string(),
        result,
        stock_return_percent: stock_return,
        final_portfolio_value,
        dataset_hash: hash,
        bar_count,
        first_date,
        last_date,
    })
}

/// Run every symbol independently and in parallel.
///
/// Output order matches `symbols`. Errors are converted to `Skipped`.
pub fn run_batch(symbols: &[String], config: &BacktestConfig) -> Vec<AssetOutcome> {
    let outcomes: Vec<AssetOutcome> = symbols
        .par_iter()
        .map(|symbol| match run_symbol(symbol, config) {
            Ok(report) => AssetOutcome::Completed(Box::new(report)),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping asset");
                AssetOutcome::Skipped {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                }
            }
        })
        .collect();

    let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
    info!(
        requested = symbols.len(),
        completed = symbols.len() - skipped,
        skipped,
        "batch complete"
    );
    outcomes
}
