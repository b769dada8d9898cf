use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::date_utils::month_name;
use crate::models::Transaction;

/// Grouping dimension for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Month,
    WeekNumber,
    Day,
    Counterparty,
}

impl Dimension {
    pub fn key_of(&self, transaction: &Transaction) -> GroupKey {
        match self {
            Dimension::Year => GroupKey::Year(transaction.year()),
            Dimension::Month => GroupKey::Month(transaction.month_number()),
            Dimension::WeekNumber => GroupKey::Week(transaction.week_number()),
            Dimension::Day => GroupKey::Day(transaction.day()),
            Dimension::Counterparty => {
                GroupKey::Counterparty(transaction.counterparty_key().to_string())
            }
        }
    }
}

/// Value of a grouping dimension. Ordering is the natural order of the
/// value: chronological for calendar keys, lexicographic for counterparties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Year(i32),
    Month(u32),
    Week(u32),
    Day(NaiveDate),
    Counterparty(String),
}

impl GroupKey {
    pub fn label(&self) -> String {
        match self {
            GroupKey::Year(year) => year.to_string(),
            GroupKey::Month(month) => month_name(*month).to_string(),
            GroupKey::Week(week) => format!("Week {}", week),
            GroupKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            GroupKey::Counterparty(key) => key.clone(),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub group_key: GroupKey,
    pub total_debit_cents: i64,
    pub total_credit_cents: i64,
    /// Always `total_credit_cents - total_debit_cents`.
    pub balance_cents: i64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income_cents: i64,
    pub expenditure_cents: i64,
    pub balance_cents: i64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub debit_cents: i64,
}

/// One histogram band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartyCount {
    pub counterparty: String,
    pub count: usize,
}
