pub mod ledger;
pub mod summary;
pub mod transaction;

pub use ledger::{Ledger, LedgerView, Schema};
pub use summary::{
    Bucket, CounterpartyCount, Dimension, GroupKey, SummaryRow, Totals, TrendPoint,
};
pub use transaction::{CalendarFields, NewTransaction, Transaction};
