//! Signal evaluation — turns one bar's indicator readings into buy/sell conditions.
//!
//! Signals are portfolio-agnostic: a rule sees only the indicator values of
//! the bar being evaluated, never cash, holdings or previous actions. The
//! position state machine decides what to do with the conditions.

use serde::{Deserialize, Serialize};

/// Indicator readings consumed by a signal rule for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub plus_di: f64,
    pub minus_di: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

impl SignalInputs {
    /// True when every reading is defined (no NaN).
    pub fn is_defined(&self) -> bool {
        !(self.plus_di.is_nan()
            || self.minus_di.is_nan()
            || self.macd.is_nan()
            || self.macd_signal.is_nan())
    }
}

/// Per-bar derived conditions. At most one of the two is ever true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    pub buy: bool,
    pub sell: bool,
}

impl SignalState {
    pub const NEUTRAL: SignalState = SignalState {
        buy: false,
        sell: false,
    };

    pub fn is_neutral(&self) -> bool {
        !self.buy && !self.sell
    }
}

/// Trait for signal rules.
///
/// # Architecture invariant
/// `evaluate` receives only indicator readings. Undefined readings must
/// produce `SignalState::NEUTRAL`.
pub trait SignalRule: Send + Sync {
    /// Human-readable name (e.g., "dmi_macd").
    fn name(&self) -> &str;

    fn evaluate(&self, inputs: &SignalInputs) -> SignalState;
}

/// Directional movement confirmed by MACD momentum.
///
/// Buy when +DI > -DI and MACD > signal; sell when -DI > +DI and
/// MACD < signal. Both comparisons are strict, so the conditions are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmiMacdRule;

impl SignalRule for DmiMacdRule {
    fn name(&self) -> &str {
        "dmi_macd"
    }

    fn evaluate(&self, inputs: &SignalInputs) -> SignalState {
        if !inputs.is_defined() {
            return SignalState::NEUTRAL;
        }
        SignalState {
            buy: inputs.plus_di > inputs.minus_di && inputs.macd > inputs.macd_signal,
            sell: inputs.minus_di > inputs.plus_di && inputs.macd < inputs.macd_signal,
        }
    }
}
