//! Portfolio ledger — cash, whole-share quantity, and round-trip statistics.

use super::transaction::{Action, Transaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completed round-trip counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Number of sells (each closes one round trip).
    pub total_trades: usize,
    /// Sells whose exit price was strictly above the last entry price.
    pub successful_trades: usize,
}

impl TradeStats {
    /// Combine two counters. Associative and commutative.
    pub fn merge(self, other: TradeStats) -> TradeStats {
        TradeStats {
            total_trades: self.total_trades + other.total_trades,
            successful_trades: self.successful_trades + other.successful_trades,
        }
    }
}

/// Mutable per-run accounting state.
///
/// Owned by a single simulation run and threaded through every bar step.
/// `cash >= 0` holds after every operation; `quantity` is always whole shares.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub quantity: u64,
    pub last_action: Option<Action>,
    pub last_buy_price: f64,
    pub stats: TradeStats,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            quantity: 0,
            last_action: None,
            last_buy_price: 0.0,
            stats: TradeStats::default(),
        }
    }

    /// Mark-to-market value: `cash + quantity * price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.quantity as f64 * price
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Largest whole number of shares the current cash buys at `price`.
    ///
    /// Steps down by one share when `floor(cash / price) * price` rounds
    /// above the available cash, so a buy can never leave cash negative.
    pub fn affordable_quantity(&self, price: f64) -> u64 {
        if !price.is_finite() || price <= 0.0 || self.cash.is_nan() || self.cash <= 0.0 {
            return 0;
        }
        let mut quantity = (self.cash / price).floor() as u64;
        while quantity > 0 && quantity as f64 * price > self.cash {
            quantity -= 1;
        }
        quantity
    }

    /// Spend all available cash on whole shares at `price`.
    ///
    /// Returns `None` and leaves the state untouched when not even one share
    /// is affordable.
    pub fn apply_buy(&mut self, date: NaiveDate, price: f64) -> Option<Transaction> {
        let quantity = self.affordable_quantity(price);
        if quantity == 0 {
            return None;
        }
        let cost = quantity as f64 * price;
        self.cash -= cost;
        self.quantity = quantity;
        self.last_action = Some(Action::Buy);
        self.last_buy_price = price;

        Some(Transaction {
            date,
            action: Action::Buy,
            price,
            quantity,
            cash: self.cash,
            portfolio_value: self.cash + cost,
        })
    }

    /// Liquidate the whole position at `price`.
    ///
    /// Returns `None` when nothing is held.
    pub fn apply_sell(&mut self, date: NaiveDate, price: f64) -> Option<Transaction> {
        if self.quantity == 0 {
            return None;
        }
        self.cash += self.quantity as f64 * price;
        self.quantity = 0;
        self.last_action = Some(Action::Sell);

        self.stats.total_trades += 1;
        if price > self.last_buy_price {
            self.stats.successful_trades += 1;
        }

        Some(Transaction {
            date,
            action: Action::Sell,
            price,
            quantity: 0,
            cash: self.cash,
            portfolio_value: self.cash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn buy_spends_all_whole_shares() {
        let mut p = PortfolioState::new(1000.0);
        let tx = p.apply_buy(day(2), 100.0).unwrap();
        assert_eq!(p.quantity, 10);
        assert_eq!(p.cash, 0.0);
        assert_eq!(tx.quantity, 10);
        assert_eq!(tx.cash, 0.0);
        assert_eq!(tx.portfolio_value, 1000.0);
        assert_eq!(p.last_action, Some(Action::Buy));
        assert_eq!(p.last_buy_price, 100.0);
    }

    #[test]
    fn buy_keeps_remainder_as_cash() {
        let mut p = PortfolioState::new(1050.0);
        p.apply_buy(day(2), 100.0).unwrap();
        assert_eq!(p.quantity, 10);
        assert_eq!(p.cash, 50.0);
        assert_eq!(p.value_at(100.0), 1050.0);
    }

    #[test]
    fn buy_declined_when_no_share_affordable() {
        let mut p = PortfolioState::new(50.0);
        assert!(p.apply_buy(day(2), 100.0).is_none());
        assert_eq!(p, PortfolioState::new(50.0));
    }

    #[test]
    fn buy_declined_on_zero_price() {
        let mut p = PortfolioState::new(1000.0);
        assert_eq!(p.affordable_quantity(0.0), 0);
        assert!(p.apply_buy(day(2), 0.0).is_none());
    }

    #[test]
    fn sell_counts_successful_round_trip() {
        let mut p = PortfolioState::new(1000.0);
        p.apply_buy(day(2), 100.0).unwrap();
        let tx = p.apply_sell(day(3), 110.0).unwrap();
        assert_eq!(p.cash, 1100.0);
        assert!(p.is_flat());
        assert_eq!(tx.quantity, 0);
        assert_eq!(tx.portfolio_value, 1100.0);
        assert_eq!(p.stats.total_trades, 1);
        assert_eq!(p.stats.successful_trades, 1);
    }

    #[test]
    fn sell_at_entry_price_is_not_successful() {
        let mut p = PortfolioState::new(1000.0);
        p.apply_buy(day(2), 100.0).unwrap();
        p.apply_sell(day(3), 100.0).unwrap();
        assert_eq!(p.stats.total_trades, 1);
        assert_eq!(p.stats.successful_trades, 0);
    }

    #[test]
    fn sell_without_position_is_noop() {
        let mut p = PortfolioState::new(1000.0);
        assert!(p.apply_sell(day(2), 100.0).is_none());
        assert_eq!(p.stats, TradeStats::default());
    }

    #[test]
    fn stats_merge_adds_counters() {
        let a = TradeStats { total_trades: 3, successful_trades: 1 };
        let b = TradeStats { total_trades: 2, successful_trades: 2 };
        assert_eq!(
            a.merge(b),
            TradeStats { total_trades: 5, successful_trades: 3 }
        );
    }
}
