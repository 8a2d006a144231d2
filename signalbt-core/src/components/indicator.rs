//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, numeric series out.
//! They are computed once before the bar loop; the engine only reads them.

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Values that are not yet defined (warmup) are `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "plus_di_15", "macd_signal_12_26_9").
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN on clean input.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Index of the first non-NaN value in `series`, if any.
pub fn first_valid_index(series: &[f64]) -> Option<usize> {
    series.iter().position(|v| !v.is_nan())
}
