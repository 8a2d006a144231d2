//! MACD — moving average convergence/divergence.
//!
//! MACD line = EMA(fast) - EMA(slow); signal = EMA(signal) of the MACD line;
//! histogram = MACD - signal. Both EMAs produce their first value on bar
//! `slow - 1`: the fast EMA is seeded from the `fast` closes ending there, not
//! from the first `fast` closes. All three lines share one warm-up boundary at
//! `slow + signal - 2`: the MACD line is masked until its signal line exists.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::ema::{ema_after_warmup, ema_of_series};

/// Which MACD output an indicator instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// The three aligned MACD outputs.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1, "MACD fast period must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        let prefix = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
            MacdLine::Histogram => "macd_hist",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let series = macd_series(&closes, self.fast, self.slow, self.signal);
        match self.line {
            MacdLine::Macd => series.macd,
            MacdLine::Signal => series.signal,
            MacdLine::Histogram => series.histogram,
        }
    }
}

/// Compute MACD, signal and histogram from a close series.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let offset = slow.saturating_sub(fast).min(closes.len());
    let mut fast_ema = vec![f64::NAN; offset];
    fast_ema.extend(ema_of_series(&closes[offset..], fast));
    let slow_ema = ema_of_series(closes, slow);

    let raw: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_after_warmup(&raw, signal);

    let macd: Vec<f64> = raw
        .iter()
        .zip(&signal_line)
        .map(|(&m, s)| if s.is_nan() { f64::NAN } else { m })
        .collect();
    let histogram = macd.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::first_valid_index;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn linear_ramp_known_values() {
        // fast=2 (alpha 2/3), slow=3 (alpha 1/2): both EMAs lag a unit ramp by a
        // constant, so the MACD line is a flat 0.5 once defined.
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let s = macd_series(&closes, 2, 3, 2);
        assert!(s.macd[..3].iter().all(|v| v.is_nan()));
        assert!(s.signal[..3].iter().all(|v| v.is_nan()));
        for i in 3..6 {
            assert_approx(s.macd[i], 0.5, DEFAULT_EPSILON);
            assert_approx(s.signal[i], 0.5, DEFAULT_EPSILON);
            assert_approx(s.histogram[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn fast_ema_seeds_alongside_slow() {
        // slow=4 seeds on SMA(2, 4, 6, 5) = 4.25 at bar 3; fast=2 seeds on
        // SMA(6, 5) = 5.5 at the same bar, giving a raw MACD of 1.25 there.
        let closes = [2.0, 4.0, 6.0, 5.0, 7.0, 8.0];
        let s = macd_series(&closes, 2, 4, 2);
        assert!(s.macd[..4].iter().all(|v| v.is_nan()));
        // raw MACD 1.25, 1.15, 1.09; signal seeds on SMA(1.25, 1.15)
        assert_approx(s.macd[4], 1.15, 1e-9);
        assert_approx(s.signal[4], 1.2, 1e-9);
        assert_approx(s.histogram[4], -0.05, 1e-9);
        assert_approx(s.macd[5], 1.09, 1e-9);
        assert_approx(s.signal[5], 3.38 / 3.0, 1e-9);
        assert_approx(s.histogram[5], -0.11 / 3.0, 1e-9);
    }

    #[test]
    fn constant_prices_give_zero_macd() {
        let bars = make_bars(&[50.0; 40]);
        let macd = Macd::new(12, 26, 9, MacdLine::Macd).compute(&bars);
        let last = macd[39];
        assert_approx(last, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn all_lines_share_warmup_boundary() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        for line in [MacdLine::Macd, MacdLine::Signal, MacdLine::Histogram] {
            let ind = Macd::new(12, 26, 9, line);
            assert_eq!(first_valid_index(&ind.compute(&bars)), Some(33), "{}", ind.name());
            assert_eq!(ind.lookback(), 33);
        }
    }

    #[test]
    fn rising_prices_put_macd_above_signal() {
        // Accelerating rally: fast EMA pulls away, MACD rises above its average.
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i * i) as f64 * 0.05).collect();
        let s = macd_series(&closes, 12, 26, 9);
        assert!(s.macd[49] > s.signal[49]);
    }

    #[test]
    fn names() {
        assert_eq!(Macd::new(12, 26, 9, MacdLine::Signal).name(), "macd_signal_12_26_9");
    }

    #[test]
    fn too_few_bars_all_nan() {
        let s = macd_series(&[1.0, 2.0, 3.0], 2, 5, 2);
        assert!(s.macd.iter().all(|v| v.is_nan()));
        assert!(s.signal.iter().all(|v| v.is_nan()));
    }
}
