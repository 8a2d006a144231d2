//! signalbt runner — batch orchestration on top of `signalbt-core`.
//!
//! This crate provides:
//! - TOML configuration with classic defaults
//! - Ticker universe and per-symbol CSV bar loading with dataset hashing
//! - Per-asset runs fanned out in parallel, with explicit skip outcomes
//! - Per-asset and cross-asset return summaries
//! - CSV/JSON artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod summary;
pub mod universe;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{dataset_hash, load_bars, LoadError, LoadedBars};
pub use export::{
    export_signals_csv, export_summary_json, export_transactions_csv, save_artifacts,
    save_summary, ArtifactPaths,
};
pub use runner::{run_asset, run_batch, run_symbol, AssetOutcome, AssetReport, RunError};
pub use summary::{stock_return_percent, success_rate, AssetReturn, BatchSummary, SkippedAsset};
pub use universe::{load_tickers, UniverseError};
