//! Ticker universe loading.
//!
//! The universe file is a CSV with a `Ticker` header column; other columns
//! are ignored. Blank entries are skipped and repeated symbols keep their
//! first position.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading a ticker universe.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read ticker file {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("ticker file {0} has no 'Ticker' column")]
    MissingColumn(PathBuf),
}

const TICKER_COLUMN: &str = "Ticker";

/// Load the ordered, de-duplicated ticker list from `path`.
pub fn load_tickers(path: &Path) -> Result<Vec<String>, UniverseError> {
    let csv_err = |source: csv::Error| UniverseError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let column = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .position(|h| h == TICKER_COLUMN)
        .ok_or_else(|| UniverseError::MissingColumn(path.to_path_buf()))?;

    let mut seen = HashSet::new();
    let mut tickers = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let Some(symbol) = record.get(column).filter(|s| !s.is_empty()) else {
            continue;
        };
        if seen.insert(symbol.to_string()) {
            tickers.push(symbol.to_string());
        }
    }
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_ticker_column_in_order() {
        let f = write_file("Ticker\nAAPL\nMSFT\nSPY\n");
        assert_eq!(load_tickers(f.path()).unwrap(), vec!["AAPL", "MSFT", "SPY"]);
    }

    #[test]
    fn ignores_other_columns() {
        let f = write_file("Name,Ticker,Sector\nApple,AAPL,Tech\nExxon,XOM,Energy\n");
        assert_eq!(load_tickers(f.path()).unwrap(), vec!["AAPL", "XOM"]);
    }

    #[test]
    fn skips_blanks_and_duplicates() {
        let f = write_file("Ticker\nAAPL\n  \nMSFT\nAAPL\n MSFT \nQQQ\n");
        assert_eq!(load_tickers(f.path()).unwrap(), vec!["AAPL", "MSFT", "QQQ"]);
    }

    #[test]
    fn missing_column_is_error() {
        let f = write_file("Symbol\nAAPL\n");
        assert!(matches!(
            load_tickers(f.path()),
            Err(UniverseError::MissingColumn(_))
        ));
    }

    #[test]
    fn missing_file_is_error() {
        let err = load_tickers(Path::new("/nonexistent/tickers.csv")).unwrap_err();
        assert!(matches!(err, UniverseError::Csv { .. }));
    }
}
