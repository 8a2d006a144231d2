//! Per-bar records and the result of a simulation run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::signal::SignalState;
use crate::domain::{Action, TradeStats, Transaction};

/// One simulated bar: conditions seen, action taken, and equity after the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub close: f64,
    pub signal: SignalState,
    /// Action executed on this bar, if any.
    pub action: Option<Action>,
    /// `cash + quantity * close` after the bar's action.
    pub portfolio_value: f64,
}

impl BarRecord {
    /// Buy marker for plotting: a buy was executed on this bar.
    pub fn buy_marker(&self) -> bool {
        self.action == Some(Action::Buy)
    }

    /// Sell marker for plotting: a sell was executed on this bar.
    pub fn sell_marker(&self) -> bool {
        self.action == Some(Action::Sell)
    }
}

/// Result of a complete simulation run for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub symbol: String,
    pub initial_cash: f64,
    /// First simulated bar; `None` when the indicators never warmed up.
    pub start_index: Option<usize>,
    /// Journal of executed buys and sells, in bar order.
    pub transactions: Vec<Transaction>,
    pub stats: TradeStats,
    /// One record per bar from `start_index` to the end of the series.
    pub bar_records: Vec<BarRecord>,
    pub final_cash: f64,
    pub final_quantity: u64,
    /// Data-quality notes (e.g. MACD not yet defined at the start index).
    pub warnings: Vec<String>,
}

impl RunResult {
    /// Result of a run that never reached a tradable bar.
    pub fn empty(symbol: impl Into<String>, initial_cash: f64, warnings: Vec<String>) -> Self {
        Self {
            symbol: symbol.into(),
            initial_cash,
            start_index: None,
            transactions: Vec::new(),
            stats: TradeStats::default(),
            bar_records: Vec::new(),
            final_cash: initial_cash,
            final_quantity: 0,
            warnings,
        }
    }

    /// True when no bar was simulated.
    pub fn is_empty(&self) -> bool {
        self.bar_records.is_empty()
    }

    pub fn total_trades(&self) -> usize {
        self.stats.total_trades
    }

    pub fn successful_trades(&self) -> usize {
        self.stats.successful_trades
    }

    /// Equity curve from the start index onward.
    pub fn portfolio_values(&self) -> Vec<f64> {
        self.bar_records.iter().map(|r| r.portfolio_value).collect()
    }

    /// Mark-to-market value on the last simulated bar, or the initial cash
    /// when nothing was simulated.
    pub fn final_portfolio_value(&self) -> f64 {
        self.bar_records
            .last()
            .map_or(self.initial_cash, |r| r.portfolio_value)
    }

    /// Whether a position is still open at the end of the series.
    pub fn has_open_position(&self) -> bool {
        self.final_quantity > 0
    }
}
