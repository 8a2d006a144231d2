//! SignalBT Core — domain types, indicators, signal rule, and simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, transactions, portfolio ledger)
//! - Directional movement (+DI, -DI, ADX) and MACD indicators
//! - The DMI/MACD signal rule
//! - Flat/Long position state machine with same-side debounce
//! - Single-pass simulation driver producing a transaction journal and equity curve

pub mod components;
pub mod domain;
pub mod engine;
pub mod indicators;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across worker threads are Send + Sync.
    ///
    /// Assets are simulated in parallel by the runner; if any of these types
    /// stops being thread-safe, the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Transaction>();
        require_sync::<domain::Transaction>();
        require_send::<domain::PortfolioState>();
        require_sync::<domain::PortfolioState>();

        // Engine types
        require_send::<engine::IndicatorFrame>();
        require_sync::<engine::IndicatorFrame>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::FrameError>();
        require_sync::<engine::FrameError>();

        // Components
        require_send::<components::DmiMacdRule>();
        require_sync::<components::DmiMacdRule>();
        require_send::<indicators::IndicatorParams>();
        require_sync::<indicators::IndicatorParams>();
    }

    /// Architecture contract: SignalRule does NOT accept portfolio state.
    ///
    /// `evaluate()` takes only `&SignalInputs`. If someone adds a portfolio
    /// parameter, every implementation breaks and so does this test.
    #[test]
    fn signal_rule_trait_has_no_portfolio_parameter() {
        fn _check_trait_object_builds(
            rule: &dyn components::SignalRule,
            inputs: &components::SignalInputs,
        ) -> components::SignalState {
            rule.evaluate(inputs)
        }
    }
}
