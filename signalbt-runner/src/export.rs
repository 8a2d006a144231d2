//! Artifact export — transaction ledgers, signal tapes, and the batch summary.
//!
//! Per asset, `save_artifacts` writes two files into the output directory:
//! - `<SYMBOL>_transactions.csv`: `Date,Action,Price,Quantity,Cash,Portfolio_Value`
//! - `<SYMBOL>_signals.csv`: per-bar close with executed buy/sell markers,
//!   the input for plotting
//!
//! The batch summary is exported as pretty JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use signalbt_core::domain::Transaction;
use signalbt_core::engine::RunResult;

use crate::runner::AssetReport;
use crate::summary::BatchSummary;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a transaction journal as CSV. Floats are written at full precision.
pub fn export_transactions_csv(transactions: &[Transaction]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Date",
        "Action",
        "Price",
        "Quantity",
        "Cash",
        "Portfolio_Value",
    ])?;

    for t in transactions {
        wtr.write_record([
            &t.date.format(DATE_FORMAT).to_string(),
            &t.action.to_string(),
            &t.price.to_string(),
            &t.quantity.to_string(),
            &t.cash.to_string(),
            &t.portfolio_value.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the per-bar signal tape (close, markers, equity) as CSV.
///
/// Markers are `1` on bars where a buy or sell was executed, else `0`.
pub fn export_signals_csv(result: &RunResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "Date",
        "Close",
        "Buy_Signal",
        "Sell_Signal",
        "Portfolio_Value",
    ])?;

    for r in &result.bar_records {
        wtr.write_record([
            &r.date.format(DATE_FORMAT).to_string(),
            &r.close.to_string(),
            &u8::from(r.buy_marker()).to_string(),
            &u8::from(r.sell_marker()).to_string(),
            &r.portfolio_value.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a batch summary to pretty JSON. NaN returns become `null`.
pub fn export_summary_json(summary: &BatchSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize BatchSummary to JSON")
}

// ─── Artifact files ─────────────────────────────────────────────────

/// Paths written by `save_artifacts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub transactions: PathBuf,
    pub signals: PathBuf,
}

/// Write the ledger and signal tape for one asset into `output_dir`.
///
/// Creates `output_dir` if needed; existing files for the symbol are replaced.
pub fn save_artifacts(report: &AssetReport, output_dir: &Path) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let transactions = output_dir.join(format!("{}_transactions.csv", report.symbol));
    let csv = export_transactions_csv(&report.result.transactions)?;
    std::fs::write(&transactions, csv)
        .with_context(|| format!("failed to write {}", transactions.display()))?;

    let signals = output_dir.join(format!("{}_signals.csv", report.symbol));
    let csv = export_signals_csv(&report.result)?;
    std::fs::write(&signals, csv)
        .with_context(|| format!("failed to write {}", signals.display()))?;

    Ok(ArtifactPaths {
        transactions,
        signals,
    })
}

/// Write `summary.json` into `output_dir`.
pub fn save_summary(summary: &BatchSummary, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let path = output_dir.join("summary.json");
    std::fs::write(&path, export_summary_json(summary)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
