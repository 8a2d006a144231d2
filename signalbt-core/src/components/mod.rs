//! Component traits — indicators and signal rules.
//!
//! Indicators produce aligned numeric series ahead of the bar loop; signal
//! rules read one bar's values and emit buy/sell conditions.

pub mod indicator;
pub mod signal;

pub use indicator::{first_valid_index, Indicator};
pub use signal::{DmiMacdRule, SignalInputs, SignalRule, SignalState};
