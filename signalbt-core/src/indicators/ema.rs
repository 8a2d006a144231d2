//! Exponential moving average helpers.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: SMA of the first `period` values.

/// Compute raw EMA values from a pre-extracted f64 slice.
///
/// NaN inside the seed window yields an all-NaN result; NaN after the seed
/// taints every later value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// EMA of a series that carries its own NaN warm-up prefix.
///
/// The seed window starts at the first non-NaN value, so composed series
/// (e.g. the MACD line) can be smoothed again.
pub fn ema_after_warmup(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    match values.iter().position(|v| !v.is_nan()) {
        Some(start) => {
            let mut result = vec![f64::NAN; start];
            result.extend(ema_of_series(&values[start..], period));
            result
        }
        None => vec![f64::NAN; n],
    }
}
