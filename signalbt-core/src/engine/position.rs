//! Position state machine — Flat/Long with same-side debounce.
//!
//! Transitions:
//! - Flat -> Long on a buy condition when cash > 0 and the last action was not a buy.
//! - Long -> Flat on a sell condition when shares are held and the last action
//!   was not a sell.
//!
//! Conditions often stay true for many consecutive bars; only the first
//! qualifying bar acts.

use crate::components::signal::SignalState;
use crate::domain::{Action, PortfolioState};

/// What the state machine asks the ledger to do on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Hold,
    Buy,
    Sell,
}

/// Decide the action for one bar. Buy takes precedence when both guards
/// pass, which cannot happen with mutually exclusive conditions.
pub fn decide(signal: SignalState, portfolio: &PortfolioState) -> Decision {
    if signal.buy && portfolio.cash > 0.0 && portfolio.last_action != Some(Action::Buy) {
        Decision::Buy
    } else if signal.sell && !portfolio.is_flat() && portfolio.last_action != Some(Action::Sell) {
        Decision::Sell
    } else {
        Decision::Hold
    }
}
