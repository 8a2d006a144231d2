//! Serializable backtest configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) reproduces the classic setup: 100 000 per ticker, DMI 15,
//! MACD 12/26/9, five years of daily bars ending 2023-10-30.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signalbt_core::indicators::IndicatorParams;
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration shared by every asset in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Starting cash per asset.
    pub initial_cash: f64,

    /// First date to load (inclusive).
    pub start_date: NaiveDate,

    /// Last date to load (exclusive).
    pub end_date: NaiveDate,

    pub indicators: IndicatorParams,

    /// Directory holding `<SYMBOL>.csv` daily bar files.
    pub data_dir: PathBuf,

    /// Directory receiving per-asset ledgers and signal files.
    pub output_dir: PathBuf,

    /// CSV with a `Ticker` column.
    pub tickers_file: PathBuf,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            start_date: NaiveDate::from_ymd_opt(2018, 10, 30).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 10, 30).unwrap_or_default(),
            indicators: IndicatorParams::default(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("transactions"),
            tickers_file: PathBuf::from("tickers.csv"),
        }
    }
}

impl BacktestConfig {
    /// Parse a TOML string and validate the result.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BacktestConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if self.start_date >= self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} must be before end_date {}",
                self.start_date, self.end_date
            )));
        }

        let p = &self.indicators;
        if p.dmi_period == 0 || p.macd_fast == 0 || p.macd_slow == 0 || p.macd_signal == 0 {
            return Err(ConfigError::Invalid(
                "indicator periods must be at least 1".into(),
            ));
        }
        if p.macd_fast >= p.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                p.macd_fast, p.macd_slow
            )));
        }
        Ok(())
    }

    /// Path of the bar file for `symbol`.
    pub fn bar_file(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }
}
