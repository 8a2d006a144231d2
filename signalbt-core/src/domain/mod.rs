//! Domain types for SignalBT

pub mod bar;
pub mod portfolio;
pub mod transaction;

pub use bar::Bar;
pub use portfolio::{PortfolioState, TradeStats};
pub use transaction::{Action, Transaction};
