use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::DateRange;
use crate::models::Transaction;

/// Which columns the source file carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub debit: bool,
    pub credit: bool,
    pub balance: bool,
    pub recipient_name: bool,
    pub transaction_type: bool,
    pub category: bool,
    pub subcategory: bool,
}

impl Schema {
    /// Every column present.
    pub fn full() -> Self {
        Self {
            debit: true,
            credit: true,
            balance: true,
            recipient_name: true,
            transaction_type: true,
            category: true,
            subcategory: true,
        }
    }

    pub fn missing_amount_columns(&self) -> Vec<&'static str> {
        [
            ("Debit", self.debit),
            ("Credit", self.credit),
            ("Balance", self.balance),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }
}

/// The transactions loaded for a session. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    schema: Schema,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>, schema: Schema) -> Self {
        Self {
            transactions,
            schema,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// A view over every row.
    pub fn view(&self) -> LedgerView<'_> {
        LedgerView {
            schema: &self.schema,
            rows: self.transactions.iter().collect(),
        }
    }

    /// Rows whose date falls inside the inclusive range.
    pub fn between(&self, range: &DateRange) -> LedgerView<'_> {
        self.view().filter(|t| range.contains(t.date()))
    }

    /// Earliest and latest transaction dates.
    pub fn extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.transactions.iter().map(Transaction::date).min()?;
        let max = self.transactions.iter().map(Transaction::date).max()?;
        Some((min, max))
    }
}

/// A filtered selection of ledger rows, in ledger order.
#[derive(Debug, Clone)]
pub struct LedgerView<'a> {
    schema: &'a Schema,
    rows: Vec<&'a Transaction>,
}

impl<'a> LedgerView<'a> {
    pub fn filter<F>(&self, predicate: F) -> LedgerView<'a>
    where
        F: Fn(&Transaction) -> bool,
    {
        LedgerView {
            schema: self.schema,
            rows: self.rows.iter().copied().filter(|t| predicate(t)).collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn ledger() -> Ledger {
        let rows = ["2024-01-05", "2024-02-10", "2024-03-15"]
            .iter()
            .enumerate()
            .map(|(i, date)| {
                Transaction::from(NewTransaction {
                    id: format!("T{}", i),
                    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                    debit_cents: 100,
                    ..Default::default()
                })
            })
            .collect();
        Ledger::new(rows, Schema::full())
    }

    #[test]
    fn test_between_is_inclusive_and_leaves_ledger_intact() {
        let ledger = ledger();
        let range = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        );
        let view = ledger.between(&range);
        assert_eq!(view.len(), 2);
        assert_eq!(ledger.len(), 3);

        let narrowed = view.filter(|t| t.month_number() == 2);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_extent() {
        let (min, max) = ledger().extent().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(Ledger::default().extent().is_none());
    }

    #[test]
    fn test_missing_amount_columns() {
        let schema = Schema {
            debit: true,
            ..Default::default()
        };
        assert_eq!(schema.missing_amount_columns(), vec!["Credit", "Balance"]);
        assert!(Schema::full().missing_amount_columns().is_empty());
    }
}
