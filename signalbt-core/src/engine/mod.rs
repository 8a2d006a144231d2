//! Backtesting engine — bar-by-bar simulation of the DMI/MACD rule.
//!
//! The engine consumes an `IndicatorFrame` (bars plus precomputed, aligned
//! indicator series) and folds over it once:
//!
//! 1. Warm-up: start at the later of the +DI/-DI boundaries
//! 2. Signal: evaluate buy/sell conditions for the bar
//! 3. Position: Flat/Long state machine with same-side debounce
//! 4. Ledger: whole-share buys with all cash, full liquidation on sells
//! 5. Mark-to-market: record portfolio value for every simulated bar

pub mod driver;
pub mod frame;
pub mod position;
pub mod state;
pub mod warmup;

pub use driver::{run_simulation, run_with_rule, step};
pub use frame::{standard_indicators, Field, FrameError, IndicatorFrame, IndicatorSeries};
pub use position::{decide, Decision};
pub use state::{BarRecord, RunResult};
pub use warmup::WarmupWindow;
