//! Performance summary — per-asset returns and the cross-asset reduction.
//!
//! Return conventions:
//! - Per asset, the base is the notional of the *first* journal entry
//!   (`price * quantity` of the opening buy), not the starting cash.
//! - Across assets, the base is `initial_cash` times the number of
//!   *requested* assets, skipped ones included.
//!
//! Undefined ratios (empty journal, zero base) are NaN, never a panic.

use serde::{Deserialize, Serialize};
use signalbt_core::domain::{TradeStats, Transaction};

use crate::runner::AssetOutcome;

/// `(last portfolio value - first notional) / first notional * 100`.
///
/// NaN when the journal is empty or the first entry has zero notional.
pub fn stock_return_percent(transactions: &[Transaction]) -> f64 {
    let (Some(first), Some(last)) = (transactions.first(), transactions.last()) else {
        return f64::NAN;
    };
    percent_change(last.portfolio_value, first.notional())
}

/// Percentage of closed trades that were profitable; 0 with no trades.
pub fn success_rate(stats: TradeStats) -> f64 {
    if stats.total_trades == 0 {
        0.0
    } else {
        stats.successful_trades as f64 / stats.total_trades as f64 * 100.0
    }
}

fn percent_change(final_value: f64, base: f64) -> f64 {
    if base == 0.0 || !base.is_finite() {
        return f64::NAN;
    }
    (final_value - base) / base * 100.0
}

/// Per-asset line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReturn {
    pub symbol: String,
    pub return_percent: f64,
    pub final_portfolio_value: f64,
    pub total_trades: usize,
    pub successful_trades: usize,
}

/// An asset that produced no report, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAsset {
    pub symbol: String,
    pub reason: String,
}

/// Aggregate over every requested asset in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub assets_requested: usize,
    pub initial_cash_per_asset: f64,
    pub total_initial_investment: f64,
    pub total_portfolio_value: f64,
    pub total_return_percent: f64,
    pub stats: TradeStats,
    pub success_rate: f64,
    pub per_asset: Vec<AssetReturn>,
    pub skipped: Vec<SkippedAsset>,
}

impl BatchSummary {
    /// Reduce batch outcomes into a summary. Order follows `outcomes`.
    pub fn from_outcomes(outcomes: &[AssetOutcome], initial_cash: f64) -> Self {
        let mut per_asset = Vec::new();
        let mut skipped = Vec::new();
        let mut total_portfolio_value = 0.0;
        let mut stats = TradeStats::default();

        for outcome in outcomes {
            match outcome {
                AssetOutcome::Completed(report) => {
                    total_portfolio_value += report.final_portfolio_value;
                    stats = stats.merge(report.result.stats);
                    per_asset.push(AssetReturn {
                        symbol: report.symbol.clone(),
                        return_percent: report.stock_return_percent,
                        final_portfolio_value: report.final_portfolio_value,
                        total_trades: report.result.total_trades(),
                        successful_trades: report.result.successful_trades(),
                    });
                }
                AssetOutcome::Skipped { symbol, reason } => skipped.push(SkippedAsset {
                    symbol: symbol.clone(),
                    reason: reason.clone(),
                }),
            }
        }

        let total_initial_investment = initial_cash * outcomes.len() as f64;
        Self {
            assets_requested: outcomes.len(),
            initial_cash_per_asset: initial_cash,
            total_initial_investment,
            total_portfolio_value,
            total_return_percent: percent_change(total_portfolio_value, total_initial_investment),
            stats,
            success_rate: success_rate(stats),
            per_asset,
            skipped,
        }
    }

    pub fn total_trades(&self) -> usize {
        self.stats.total_trades
    }

    pub fn successful_trades(&self) -> usize {
        self.stats.successful_trades
    }

    pub fn assets_completed(&self) -> usize {
        self.per_asset.len()
    }
}
