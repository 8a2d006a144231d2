//! Transaction — one entry of the audit journal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.write_str("Buy"),
            Action::Sell => f.write_str("Sell"),
        }
    }
}

/// Snapshot taken at the moment a buy or sell is executed.
///
/// `quantity`, `cash` and `portfolio_value` are the values *after* the
/// action. Entries are appended in bar order and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub action: Action,
    pub price: f64,
    pub quantity: u64,
    pub cash: f64,
    pub portfolio_value: f64,
}

impl Transaction {
    /// Capital committed by this entry: `price * quantity`.
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display_matches_ledger_labels() {
        assert_eq!(Action::Buy.to_string(), "Buy");
        assert_eq!(Action::Sell.to_string(), "Sell");
    }

    #[test]
    fn notional_of_buy() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            action: Action::Buy,
            price: 100.0,
            quantity: 10,
            cash: 0.0,
            portfolio_value: 1000.0,
        };
        assert_eq!(tx.notional(), 1000.0);
    }

    #[test]
    fn transaction_serialization_roundtrip() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            action: Action::Sell,
            price: 110.0,
            quantity: 0,
            cash: 1100.0,
            portfolio_value: 1100.0,
        };
        let json = serde_json::to_string(&tx).unwrap();
        let deser: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, deser);
    }
}
