use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Dimension, GroupKey, LedgerView, SummaryRow, Totals, TrendPoint};

#[derive(Default)]
struct Accumulator {
    debit_cents: i64,
    credit_cents: i64,
    count: usize,
}

/// Group the view by `group_by` and sum debits and credits per group.
///
/// Groups come back in ascending key order. The balance of every row is
/// recomputed as credit minus debit; the statement balance is never used.
pub fn summarize(view: &LedgerView<'_>, group_by: Dimension) -> AppResult<Vec<SummaryRow>> {
    let missing = view.schema().missing_amount_columns();
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "Column(s) {} not present in ledger",
            missing.join(", ")
        )));
    }

    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for transaction in view.iter() {
        let entry = groups.entry(group_by.key_of(transaction)).or_default();
        entry.debit_cents += transaction.debit_cents;
        entry.credit_cents += transaction.credit_cents;
        entry.count += 1;
    }

    debug!(
        ?group_by,
        row_count = view.len(),
        group_count = groups.len(),
        "Summarized ledger view"
    );

    Ok(groups
        .into_iter()
        .map(|(group_key, acc)| SummaryRow {
            group_key,
            total_debit_cents: acc.debit_cents,
            total_credit_cents: acc.credit_cents,
            balance_cents: acc.credit_cents - acc.debit_cents,
            transaction_count: acc.count,
        })
        .collect())
}

/// Income, expenditure and recomputed balance over the whole view.
pub fn totals(view: &LedgerView<'_>) -> Totals {
    let income_cents: i64 = view.iter().map(|t| t.credit_cents).sum();
    let expenditure_cents: i64 = view.iter().map(|t| t.debit_cents).sum();

    Totals {
        income_cents,
        expenditure_cents,
        balance_cents: income_cents - expenditure_cents,
        transaction_count: view.len(),
    }
}

/// Total debits per date, oldest first.
pub fn daily_debit_trend(view: &LedgerView<'_>) -> Vec<TrendPoint> {
    let mut daily: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for transaction in view.iter() {
        *daily.entry(transaction.date()).or_insert(0) += transaction.debit_cents;
    }

    daily
        .into_iter()
        .map(|(date, debit_cents)| TrendPoint { date, debit_cents })
        .collect()
}

pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let remainder = abs_cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if is_negative {
        format!("-{}.{:02}", grouped, remainder)
    } else {
        format!("{}.{:02}", grouped, remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ledger, NewTransaction, Schema, Transaction};

    fn tx(id: &str, date: &str, debit: i64, credit: i64, balance: i64) -> Transaction {
        Transaction::from(NewTransaction {
            id: id.into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            debit_cents: debit,
            credit_cents: credit,
            balance_cents: balance,
            recipient_name: Some(format!("payee-{}", id)),
            ..Default::default()
        })
    }

    fn sample() -> Ledger {
        Ledger::new(
            vec![
                tx("1", "2024-01-05", 10_000, 0, 990_000),
                tx("2", "2024-01-20", 0, 50_000, 1_040_000),
                tx("3", "2024-02-03", 2_500, 0, 1_037_500),
                tx("4", "2023-12-30", 700, 1_200, 1_000_000),
                tx("5", "2024-02-03", 300, 0, 1_037_200),
            ],
            Schema::full(),
        )
    }

    #[test]
    fn test_two_row_month_example() {
        let ledger = Ledger::new(
            vec![
                tx("a", "2024-01-05", 10_000, 0, 0),
                tx("b", "2024-01-20", 0, 50_000, 0),
            ],
            Schema::full(),
        );
        let rows = summarize(&ledger.view(), Dimension::Month).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.group_key.label(), "January");
        assert_eq!(row.total_debit_cents, 10_000);
        assert_eq!(row.total_credit_cents, 50_000);
        assert_eq!(row.balance_cents, 40_000);
        assert_eq!(row.transaction_count, 2);
    }

    #[test]
    fn test_groups_are_chronological() {
        let ledger = sample();
        let years: Vec<String> = summarize(&ledger.view(), Dimension::Year)
            .unwrap()
            .iter()
            .map(|r| r.group_key.label())
            .collect();
        assert_eq!(years, vec!["2023", "2024"]);

        let days: Vec<String> = summarize(&ledger.view(), Dimension::Day)
            .unwrap()
            .iter()
            .map(|r| r.group_key.label())
            .collect();
        assert_eq!(
            days,
            vec!["2023-12-30", "2024-01-05", "2024-01-20", "2024-02-03"]
        );
    }

    #[test]
    fn test_aggregation_is_conservative() {
        let ledger = sample();
        let view = ledger.view();
        let whole = totals(&view);
        for dimension in [
            Dimension::Year,
            Dimension::Month,
            Dimension::WeekNumber,
            Dimension::Day,
            Dimension::Counterparty,
        ] {
            let rows = summarize(&view, dimension).unwrap();
            let credit: i64 = rows.iter().map(|r| r.total_credit_cents).sum();
            let debit: i64 = rows.iter().map(|r| r.total_debit_cents).sum();
            let count: usize = rows.iter().map(|r| r.transaction_count).sum();
            assert_eq!(credit - debit, whole.balance_cents, "{:?}", dimension);
            assert_eq!(count, whole.transaction_count);
        }
    }

    #[test]
    fn test_balance_is_recomputed_not_statement_balance() {
        let ledger = sample();
        for row in summarize(&ledger.view(), Dimension::Day).unwrap() {
            assert_eq!(
                row.balance_cents,
                row.total_credit_cents - row.total_debit_cents
            );
        }
        let feb: Vec<SummaryRow> = summarize(
            &ledger.view().filter(|t| t.month_number() == 2),
            Dimension::Month,
        )
        .unwrap();
        assert_eq!(feb[0].balance_cents, -2_800);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let ledger = sample();
        let view = ledger.view();
        assert_eq!(
            summarize(&view, Dimension::WeekNumber).unwrap(),
            summarize(&view, Dimension::WeekNumber).unwrap()
        );
    }

    #[test]
    fn test_missing_amount_column_is_schema_error() {
        let ledger = Ledger::new(
            vec![tx("1", "2024-01-05", 100, 0, 0)],
            Schema {
                debit: true,
                category: true,
                ..Default::default()
            },
        );
        match summarize(&ledger.view(), Dimension::Month) {
            Err(AppError::Schema(msg)) => assert!(msg.contains("Credit")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_view_summarizes_to_nothing() {
        let ledger = Ledger::new(Vec::new(), Schema::full());
        assert!(summarize(&ledger.view(), Dimension::Day).unwrap().is_empty());
        assert_eq!(totals(&ledger.view()), Totals::default());
    }

    #[test]
    fn test_daily_debit_trend() {
        let ledger = sample();
        let trend = daily_debit_trend(&ledger.view());
        assert_eq!(trend.len(), 4);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2023, 12, 30).unwrap());
        assert_eq!(trend[3].debit_cents, 2_800);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(123_456_789), "1,234,567.89");
        assert_eq!(format_cents(-2_550), "-25.50");
        assert_eq!(format_cents(100_000), "1,000.00");
    }
}
