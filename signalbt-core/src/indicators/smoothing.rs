//! True range and the running-sum Wilder smoother behind +DI/-DI.

use crate::domain::Bar;

/// Magnitudes below this are treated as zero by the directional indicators.
const ZERO_EPSILON: f64 = 1e-8;

pub(crate) fn is_zero(v: f64) -> bool {
    v.abs() < ZERO_EPSILON
}

/// Compute the True Range series from bars.
///
/// TR[0] is NaN (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Wilder running sum: S[t] = S[t-1] - S[t-1]/period + x[t].
///
/// Seed: plain sum of the first `period - 1` values of the first run of
/// `period` consecutive non-NaN values, followed by one Wilder step, so the
/// first output sits on the last value of that run. A NaN after the seed
/// taints every later value.
pub fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let Some(seed_start) = first_valid_run(values, period) else {
        return result;
    };
    let first_out = seed_start + period - 1;

    let mut prev: f64 = values[seed_start..first_out].iter().sum();
    let p = period as f64;

    for i in first_out..n {
        if values[i].is_nan() {
            return result;
        }
        prev = prev - prev / p + values[i];
        result[i] = prev;
    }

    result
}

/// Start of the first window of `len` consecutive non-NaN values.
fn first_valid_run(values: &[f64], len: usize) -> Option<usize> {
    let mut run = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            run = 0;
            continue;
        }
        run += 1;
        if run == len {
            return Some(i + 1 - len);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_sum_seed_and_recursion() {
        let values = [f64::NAN, 8.0, 9.0, 6.0, 6.0];
        let result = wilder_sum(&values, 3);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        // Seed 8 + 9 = 17; 17 - 17/3 + 6 = 52/3; 52/3 - 52/9 + 6 = 158/9
        assert_approx(result[3], 52.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 158.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_sum_period_one_is_identity() {
        let result = wilder_sum(&[f64::NAN, 3.0, 5.0], 1);
        assert!(result[0].is_nan());
        assert_approx(result[1], 3.0, DEFAULT_EPSILON);
        assert_approx(result[2], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_sum_seed_restarts_after_gap() {
        let values = [1.0, f64::NAN, 2.0, 4.0, 6.0];
        let result = wilder_sum(&values, 2);
        assert!(result[0].is_nan());
        assert!(result[2].is_nan());
        // 2 - 2/2 + 4 = 5; 5 - 5/2 + 6 = 8.5
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);
        assert_approx(result[4], 8.5, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_sum_nan_after_seed_taints_tail() {
        let values = [2.0, 4.0, f64::NAN, 6.0];
        let result = wilder_sum(&values, 2);
        assert_approx(result[1], 5.0, DEFAULT_EPSILON);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
    }

    #[test]
    fn wilder_sum_too_short() {
        assert!(wilder_sum(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert!(wilder_sum(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
