use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_utils::{month_name, week_number};

/// Calendar fields derived from a transaction date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarFields {
    pub year: i32,
    pub month_number: u32,
    pub month_name: &'static str,
    pub week_number: u32,
}

impl CalendarFields {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_number: date.month(),
            month_name: month_name(date.month()),
            week_number: week_number(date),
        }
    }
}

/// Row data as read from a statement, before calendar fields are derived.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub debit_cents: i64,
    /// The debit cell was empty. An explicit `0` leaves this false.
    pub debit_blank: bool,
    pub credit_cents: i64,
    pub balance_cents: i64,
    pub recipient_name: Option<String>,
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// One ledger row. The date and its calendar fields can only be set together
/// through [`NewTransaction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    date: NaiveDate,
    pub debit_cents: i64,
    #[serde(skip)]
    pub debit_blank: bool,
    pub credit_cents: i64,
    pub balance_cents: i64,
    pub recipient_name: Option<String>,
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(flatten)]
    calendar: CalendarFields,
}

impl From<NewTransaction> for Transaction {
    fn from(new: NewTransaction) -> Self {
        Self {
            calendar: CalendarFields::from_date(new.date),
            id: new.id,
            date: new.date,
            debit_cents: new.debit_cents,
            debit_blank: new.debit_blank,
            credit_cents: new.credit_cents,
            balance_cents: new.balance_cents,
            recipient_name: new.recipient_name,
            transaction_type: new.transaction_type,
            category: new.category,
            subcategory: new.subcategory,
        }
    }
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.calendar.year
    }

    pub fn month_number(&self) -> u32 {
        self.calendar.month_number
    }

    pub fn month_name(&self) -> &'static str {
        self.calendar.month_name
    }

    pub fn week_number(&self) -> u32 {
        self.calendar.week_number
    }

    /// Recipient name when present, otherwise the transaction id.
    pub fn counterparty_key(&self) -> &str {
        self.recipient_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn net_cents(&self) -> i64 {
        self.credit_cents - self.debit_cents
    }
}
