//! Daily bar loading from per-symbol CSV files.
//!
//! Each symbol lives in its own CSV (see `BacktestConfig::bar_file`) with the
//! usual daily download header: `Date,Open,High,Low,Close[,Adj Close],Volume`.
//! Extra columns are ignored. Rows are filtered to `[start, end)`, sorted by
//! date, and rejected if a date repeats or a price is missing. Rows whose OHLC
//! values contradict each other are kept and logged.
//!
//! Every load also yields a BLAKE3 dataset hash so a report can be tied to
//! the exact bars it was computed from.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use signalbt_core::domain::Bar;
use thiserror::Error;
use tracing::warn;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data file for '{symbol}' at {path}")]
    NotFound { symbol: String, path: PathBuf },

    #[error("no bars for '{symbol}' between {start} and {end}")]
    Empty {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to read data for '{symbol}': {source}")]
    Csv { symbol: String, source: csv::Error },

    #[error("bad row for '{symbol}' at line {line}: {reason}")]
    BadRow {
        symbol: String,
        line: u64,
        reason: String,
    },

    #[error("duplicate date {date} in data for '{symbol}'")]
    DuplicateDate { symbol: String, date: NaiveDate },
}

/// Bars for one symbol plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// BLAKE3 over dates and OHLCV values.
    pub dataset_hash: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

/// Parse the leading `YYYY-MM-DD` of a date cell. Timestamps with a time
/// and offset suffix are accepted.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Load daily bars for `symbol` from the CSV at `path`, keeping
/// `start <= date < end`.
pub fn load_bars(
    path: &Path,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LoadedBars, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            symbol: symbol.to_string(),
            path: path.to_path_buf(),
        });
    }

    let csv_err = |source: csv::Error| LoadError::Csv {
        symbol: symbol.to_string(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let mut record = csv::StringRecord::new();

    let mut bars = Vec::new();
    let mut inconsistent = 0usize;
    while rdr.read_record(&mut record).map_err(csv_err)? {
        let row: CsvRow = record.deserialize(Some(&headers)).map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());

        let date = parse_date(&row.date).ok_or_else(|| LoadError::BadRow {
            symbol: symbol.to_string(),
            line,
            reason: format!("unparseable date '{}'", row.date),
        })?;
        if date < start || date >= end {
            continue;
        }
        if !row.volume.is_finite() || row.volume < 0.0 {
            return Err(LoadError::BadRow {
                symbol: symbol.to_string(),
                line,
                reason: format!("invalid volume {}", row.volume),
            });
        }

        let bar = Bar {
            symbol: symbol.to_string(),
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.round() as u64,
        };
        if bar.is_void() {
            return Err(LoadError::BadRow {
                symbol: symbol.to_string(),
                line,
                reason: "missing price".into(),
            });
        }
        if !bar.is_sane() {
            inconsistent += 1;
        }
        bars.push(bar);
    }

    if inconsistent > 0 {
        warn!(symbol, rows = inconsistent, "bars with inconsistent OHLC values");
    }

    if bars.is_empty() {
        return Err(LoadError::Empty {
            symbol: symbol.to_string(),
            start,
            end,
        });
    }

    bars.sort_by_key(|b| b.date);
    if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(LoadError::DuplicateDate {
            symbol: symbol.to_string(),
            date: pair[0].date,
        });
    }

    let dataset_hash = dataset_hash(&bars);
    Ok(LoadedBars {
        symbol: symbol.to_string(),
        bars,
        dataset_hash,
    })
}

/// Deterministic BLAKE3 hash over symbol, dates and OHLCV values.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.symbol.as_bytes());
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
