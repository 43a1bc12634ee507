use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single validated ledger row.
///
/// Core fields only, typed once at load time. Downstream operations consume
/// these fields directly and never re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Normalized timestamp. A date-only source value becomes midnight.
    pub date: NaiveDateTime,

    /// Free-text label from the source. Not unique.
    pub description: String,

    /// Signed amount: positive = inflow, negative = outflow, zero = neither.
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDateTime, description: impl Into<String>, amount: f64) -> Self {
        Transaction {
            date,
            description: description.into(),
            amount,
        }
    }
}

/// The full ordered set of transactions loaded from one source.
///
/// Order is source row order. The collection is immutable once built:
/// analytics operations derive new views, they never mutate the ledger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Ledger { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Shorthand for building a timestamp in tests and fixtures.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_transaction_new() {
        let tx = Transaction::new(date(2024, 1, 1), "Coffee", -4.50);
        assert_eq!(tx.description, "Coffee");
        assert_eq!(tx.amount, -4.50);
        assert_eq!(tx.date, date(2024, 1, 1));
    }

    #[test]
    fn test_ledger_preserves_row_order() {
        let ledger = Ledger::new(vec![
            Transaction::new(date(2024, 1, 2), "Second", 1.0),
            Transaction::new(date(2024, 1, 1), "First", 2.0),
        ]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[0].description, "Second");
        assert_eq!(ledger.transactions()[1].description, "First");
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_dates_are_totally_ordered() {
        assert!(date(2024, 1, 1) < date(2024, 1, 2));
        assert!(date(2023, 12, 31) < date(2024, 1, 1));
    }
}
