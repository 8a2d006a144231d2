//! DMI — Wilder's directional movement system (+DI, -DI, ADX).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR with a Wilder running sum seeded from the
//!    first `period - 1` moves
//! 3. +DI = 100 * sum(+DM) / sum(TR)
//! 4. -DI = 100 * sum(-DM) / sum(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = mean of the first `period` DX values, then Wilder-averaged
//!
//! Lookback: `period` for +DI/-DI, `2 * period - 1` for ADX.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::smoothing::{is_zero, true_range, wilder_sum};

/// Which output of the directional movement system an indicator instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmiComponent {
    PlusDi,
    MinusDi,
    Adx,
}

/// The three aligned DMI outputs.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub adx: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Dmi {
    period: usize,
    component: DmiComponent,
    name: String,
}

impl Dmi {
    pub fn new(period: usize, component: DmiComponent) -> Self {
        assert!(period >= 1, "DMI period must be >= 1");
        let prefix = match component {
            DmiComponent::PlusDi => "plus_di",
            DmiComponent::MinusDi => "minus_di",
            DmiComponent::Adx => "adx",
        };
        Self {
            period,
            component,
            name: format!("{prefix}_{period}"),
        }
    }
}

impl Indicator for Dmi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.component {
            DmiComponent::PlusDi | DmiComponent::MinusDi => self.period,
            DmiComponent::Adx => 2 * self.period - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let series = directional_movement(bars, self.period);
        match self.component {
            DmiComponent::PlusDi => series.plus_di,
            DmiComponent::MinusDi => series.minus_di,
            DmiComponent::Adx => series.adx,
        }
    }
}

/// Compute +DI, -DI and ADX in one pass over the bars.
pub fn directional_movement(bars: &[Bar], period: usize) -> DirectionalSeries {
    let n = bars.len();
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        if bars[i].high.is_nan()
            || bars[i].low.is_nan()
            || bars[i - 1].high.is_nan()
            || bars[i - 1].low.is_nan()
        {
            continue;
        }

        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        plus_dm[i] = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        minus_dm[i] = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };
    }

    let sum_tr = wilder_sum(&true_range(bars), period);
    let sum_plus_dm = wilder_sum(&plus_dm, period);
    let sum_minus_dm = wilder_sum(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];

    for i in 0..n {
        if sum_tr[i].is_nan() || sum_plus_dm[i].is_nan() || sum_minus_dm[i].is_nan() {
            continue;
        }

        // Flat range: no directional movement either way.
        if is_zero(sum_tr[i]) {
            plus_di[i] = 0.0;
            minus_di[i] = 0.0;
        } else {
            plus_di[i] = 100.0 * sum_plus_dm[i] / sum_tr[i];
            minus_di[i] = 100.0 * sum_minus_dm[i] / sum_tr[i];
        }
    }

    let adx = average_directional_index(&plus_di, &minus_di, period);
    DirectionalSeries {
        plus_di,
        minus_di,
        adx,
    }
}

/// DX for one bar; `None` when both DIs are zero.
fn directional_index(plus_di: f64, minus_di: f64) -> Option<f64> {
    let di_sum = plus_di + minus_di;
    if is_zero(di_sum) {
        None
    } else {
        Some(100.0 * (plus_di - minus_di).abs() / di_sum)
    }
}

/// ADX over aligned DI series.
///
/// The seed averages the first `period` DX values, counting an undefined DX
/// as zero. Afterwards ADX[t] = (ADX[t-1] * (period - 1) + DX[t]) / period,
/// and an undefined DX holds the previous value.
fn average_directional_index(plus_di: &[f64], minus_di: &[f64], period: usize) -> Vec<f64> {
    let n = plus_di.len();
    let mut adx = vec![f64::NAN; n];
    if period == 0 {
        return adx;
    }

    let Some(first) = plus_di.iter().position(|v| !v.is_nan()) else {
        return adx;
    };
    let seed_at = first + period - 1;
    if seed_at >= n {
        return adx;
    }

    let p = period as f64;
    let mut sum = 0.0;
    for i in first..=seed_at {
        if plus_di[i].is_nan() || minus_di[i].is_nan() {
            return adx;
        }
        sum += directional_index(plus_di[i], minus_di[i]).unwrap_or(0.0);
    }
    let mut prev = sum / p;
    adx[seed_at] = prev;

    for i in seed_at + 1..n {
        if plus_di[i].is_nan() || minus_di[i].is_nan() {
            return adx;
        }
        if let Some(dx) = directional_index(plus_di[i], minus_di[i]) {
            prev = (prev * (p - 1.0) + dx) / p;
        }
        adx[i] = prev;
    }

    adx
}
