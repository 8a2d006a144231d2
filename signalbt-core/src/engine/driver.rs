//! Simulation driver — the single-pass, bar-by-bar fold.
//!
//! Per bar, in order:
//! 1. Evaluate the signal rule on the bar's indicator readings
//! 2. Ask the position state machine for a decision
//! 3. Apply the decision to the ledger, journaling any transaction
//! 4. Record mark-to-market portfolio value
//!
//! Bar i's decision depends only on state carried from bars < i and bar i's
//! own values. There is no lookahead and no reordering.

use tracing::debug;

use crate::components::signal::{DmiMacdRule, SignalRule};
use crate::domain::{PortfolioState, Transaction};
use crate::engine::frame::IndicatorFrame;
use crate::engine::position::{decide, Decision};
use crate::engine::state::{BarRecord, RunResult};
use crate::engine::warmup::WarmupWindow;

/// Run the DMI/MACD rule over a frame with the given starting cash.
pub fn run_simulation(frame: &IndicatorFrame, initial_cash: f64) -> RunResult {
    run_with_rule(frame, initial_cash, &DmiMacdRule)
}

/// Run an arbitrary signal rule over a frame.
pub fn run_with_rule(
    frame: &IndicatorFrame,
    initial_cash: f64,
    rule: &dyn SignalRule,
) -> RunResult {
    let symbol = frame.symbol().to_string();

    let Some(window) = WarmupWindow::from_frame(frame) else {
        debug!(
            symbol = %symbol,
            bars = frame.len(),
            "directional indicators never defined, nothing to simulate"
        );
        return RunResult::empty(
            symbol,
            initial_cash,
            vec![format!(
                "insufficient data: +DI/-DI undefined across all {} bars",
                frame.len()
            )],
        );
    };

    let mut warnings = Vec::new();
    if window.macd_lagging() {
        let note = match window.macd_lag_bars() {
            Some(lag) => format!(
                "MACD undefined for the first {lag} bars after start index {}",
                window.start_index
            ),
            None => "MACD undefined across the whole series".to_string(),
        };
        debug!(symbol = %symbol, "{note}");
        warnings.push(note);
    }

    let mut portfolio = PortfolioState::new(initial_cash);
    let mut journal = Vec::new();
    let mut bar_records = Vec::with_capacity(frame.len() - window.start_index);

    for bar_index in window.start_index..frame.len() {
        let record = step(frame, bar_index, rule, &mut portfolio, &mut journal);
        bar_records.push(record);
    }

    debug!(
        symbol = %symbol,
        rule = rule.name(),
        start_index = window.start_index,
        transactions = journal.len(),
        trades = portfolio.stats.total_trades,
        "simulation complete"
    );

    RunResult {
        symbol,
        initial_cash,
        start_index: Some(window.start_index),
        transactions: journal,
        stats: portfolio.stats,
        bar_records,
        final_cash: portfolio.cash,
        final_quantity: portfolio.quantity,
        warnings,
    }
}

/// Process one bar against the carried portfolio state.
pub fn step(
    frame: &IndicatorFrame,
    bar_index: usize,
    rule: &dyn SignalRule,
    portfolio: &mut PortfolioState,
    journal: &mut Vec<Transaction>,
) -> BarRecord {
    let bar = frame.bar(bar_index);
    let signal = rule.evaluate(&frame.inputs(bar_index));

    let executed = match decide(signal, portfolio) {
        Decision::Buy => portfolio.apply_buy(bar.date, bar.close),
        Decision::Sell => portfolio.apply_sell(bar.date, bar.close),
        Decision::Hold => None,
    };

    let action = executed.map(|tx| {
        debug!(
            symbol = %bar.symbol,
            date = %tx.date,
            action = %tx.action,
            price = tx.price,
            quantity = tx.quantity,
            cash = tx.cash,
            "transaction"
        );
        let action = tx.action;
        journal.push(tx);
        action
    });

    BarRecord {
        bar_index,
        date: bar.date,
        close: bar.close,
        signal,
        action,
        portfolio_value: portfolio.value_at(bar.close),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signal::SignalState;
    use crate::domain::Action;
    use crate::engine::frame::IndicatorSeries;
    use crate::indicators::make_bars;

    #[derive(Clone, Copy)]
    enum Sig {
        Buy,
        Sell,
        Flat,
        Nan,
    }

    /// Frame whose indicator readings produce the requested condition per bar.
    fn scripted(closes: &[f64], sigs: &[Sig]) -> IndicatorFrame {
        assert_eq!(closes.len(), sigs.len());
        let mut s = IndicatorSeries::default();
        for sig in sigs {
            let (p, m, macd, sig_line) = match sig {
                Sig::Buy => (30.0, 20.0, 1.0, 0.5),
                Sig::Sell => (20.0, 30.0, 0.5, 1.0),
                Sig::Flat => (30.0, 20.0, 0.5, 1.0),
                Sig::Nan => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
            };
            s.adx.push(25.0);
            s.plus_di.push(p);
            s.minus_di.push(m);
            s.macd.push(macd);
            s.macd_signal.push(sig_line);
        }
        IndicatorFrame::new(make_bars(closes), s).unwrap()
    }

    #[test]
    fn single_buy_deploys_all_cash() {
        let frame = scripted(&[100.0, 100.0, 100.0], &[Sig::Flat, Sig::Buy, Sig::Flat]);
        let r = run_simulation(&frame, 1000.0);
        assert_eq!(r.transactions.len(), 1);
        let tx = &r.transactions[0];
        assert_eq!(tx.action, Action::Buy);
        assert_eq!((tx.price, tx.quantity, tx.cash, tx.portfolio_value), (100.0, 10, 0.0, 1000.0));
        assert_eq!(r.final_quantity, 10);
        assert_eq!(r.final_cash, 0.0);
        assert_eq!(r.portfolio_values(), vec![1000.0, 1000.0, 1000.0]);
    }

    #[test]
    fn buy_then_sell_completes_round_trip() {
        let frame = scripted(&[100.0, 110.0], &[Sig::Buy, Sig::Sell]);
        let r = run_simulation(&frame, 1000.0);
        assert_eq!(r.transactions.len(), 2);
        assert_eq!(r.transactions[1].action, Action::Sell);
        assert_eq!(r.transactions[1].cash, 1100.0);
        assert_eq!(r.final_cash, 1100.0);
        assert_eq!(r.final_quantity, 0);
        assert_eq!(r.total_trades(), 1);
        assert_eq!(r.successful_trades(), 1);
    }

    #[test]
    fn unaffordable_buy_is_declined() {
        let frame = scripted(&[100.0, 100.0], &[Sig::Buy, Sig::Buy]);
        let r = run_simulation(&frame, 50.0);
        assert!(r.transactions.is_empty());
        assert_eq!(r.final_cash, 50.0);
        assert_eq!(r.final_quantity, 0);
        assert!(r.bar_records.iter().all(|b| b.action.is_none()));
        assert_eq!(r.portfolio_values(), vec![50.0, 50.0]);
    }

    #[test]
    fn repeated_buy_condition_buys_once() {
        let frame = scripted(&[100.0, 101.0, 102.0], &[Sig::Buy, Sig::Buy, Sig::Buy]);
        let r = run_simulation(&frame, 1000.0);
        assert_eq!(r.transactions.len(), 1);
        assert_eq!(r.bar_records[0].action, Some(Action::Buy));
        assert_eq!(r.bar_records[1].action, None);
        assert_eq!(r.bar_records[2].action, None);
        // Conditions stay recorded even when nothing executes
        assert!(r.bar_records[2].signal.buy);
    }

    #[test]
    fn simulation_starts_after_directional_warmup() {
        let frame = scripted(
            &[90.0, 95.0, 100.0, 100.0],
            &[Sig::Nan, Sig::Nan, Sig::Buy, Sig::Flat],
        );
        let r = run_simulation(&frame, 1000.0);
        assert_eq!(r.start_index, Some(2));
        assert_eq!(r.bar_records.len(), 2);
        assert_eq!(r.bar_records[0].bar_index, 2);
        assert_eq!(r.transactions[0].price, 100.0);
    }

    #[test]
    fn insufficient_data_yields_empty_result() {
        let frame = scripted(&[100.0, 101.0], &[Sig::Nan, Sig::Nan]);
        let r = run_simulation(&frame, 1000.0);
        assert!(r.is_empty());
        assert_eq!(r.start_index, None);
        assert_eq!(r.final_portfolio_value(), 1000.0);
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn empty_frame_yields_empty_result() {
        let frame = IndicatorFrame::new(Vec::new(), IndicatorSeries::default()).unwrap();
        let r = run_simulation(&frame, 1000.0);
        assert!(r.is_empty());
        assert!(r.transactions.is_empty());
    }

    #[test]
    fn lagging_macd_is_flagged_and_neutral() {
        let mut frame_series = IndicatorSeries::default();
        for i in 0..4 {
            frame_series.adx.push(20.0);
            frame_series.plus_di.push(30.0);
            frame_series.minus_di.push(20.0);
            let defined = i >= 2;
            frame_series.macd.push(if defined { 1.0 } else { f64::NAN });
            frame_series.macd_signal.push(if defined { 0.5 } else { f64::NAN });
        }
        let frame = IndicatorFrame::new(make_bars(&[100.0; 4]), frame_series).unwrap();
        let r = run_simulation(&frame, 1000.0);
        assert_eq!(r.start_index, Some(0));
        assert_eq!(r.warnings.len(), 1);
        assert!(r.bar_records[0].signal.is_neutral());
        assert!(r.bar_records[1].signal.is_neutral());
        assert_eq!(r.bar_records[2].action, Some(Action::Buy));
    }

    #[test]
    fn open_position_is_not_closed_at_end() {
        let frame = scripted(&[100.0, 120.0], &[Sig::Buy, Sig::Flat]);
        let r = run_simulation(&frame, 1000.0);
        assert!(r.has_open_position());
        assert_eq!(r.total_trades(), 0);
        assert_eq!(r.final_portfolio_value(), 1200.0);
    }

    struct AlwaysBuy;

    impl SignalRule for AlwaysBuy {
        fn name(&self) -> &str {
            "always_buy"
        }

        fn evaluate(&self, _inputs: &crate::components::signal::SignalInputs) -> SignalState {
            SignalState {
                buy: true,
                sell: false,
            }
        }
    }

    #[test]
    fn custom_rule_is_honoured() {
        let frame = scripted(&[100.0, 100.0], &[Sig::Sell, Sig::Sell]);
        let r = run_with_rule(&frame, 1000.0, &AlwaysBuy);
        assert_eq!(r.transactions.len(), 1);
        assert_eq!(r.transactions[0].action, Action::Buy);
    }
}
