use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{LedgerView, Totals};
use crate::services::aggregator;

const RECENT_LIMIT: usize = 10;
const TOP_TYPES: usize = 5;
const UNKNOWN_TYPE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub total_credit_cents: i64,
    pub total_debit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSpending {
    pub transaction_type: String,
    pub debit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentTransaction {
    pub transaction_id: String,
    pub transaction_date: NaiveDate,
    pub recipient_name: Option<String>,
    pub debit_cents: i64,
    pub credit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsGoal {
    pub current_cents: i64,
    pub target_cents: i64,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardAnalytics {
    pub summary: Totals,
    pub monthly_analysis: Vec<MonthlyFlow>,
    pub category_analysis: Vec<TypeSpending>,
    pub recent_transactions: Vec<RecentTransaction>,
    pub savings_goal: SavingsGoal,
}

/// Credit and debit per calendar month, oldest first, labelled "Jan 2024".
pub fn monthly_analysis(view: &LedgerView<'_>) -> Vec<MonthlyFlow> {
    let mut months: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();
    for t in view.iter() {
        let entry = months.entry((t.year(), t.month_number())).or_insert((0, 0));
        entry.0 += t.credit_cents;
        entry.1 += t.debit_cents;
    }

    months
        .into_iter()
        .filter_map(|((year, month), (credit, debit))| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(MonthlyFlow {
                month: first.format("%b %Y").to_string(),
                total_credit_cents: credit,
                total_debit_cents: debit,
            })
        })
        .collect()
}

/// Transaction types with the highest total debit.
pub fn top_transaction_types(view: &LedgerView<'_>, n: usize) -> Vec<TypeSpending> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for t in view.iter() {
        let key = t.transaction_type.as_deref().unwrap_or(UNKNOWN_TYPE);
        *totals.entry(key).or_insert(0) += t.debit_cents;
    }

    let mut ranked: Vec<(&str, i64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .map(|(name, debit_cents)| TypeSpending {
            transaction_type: name.to_string(),
            debit_cents,
        })
        .collect()
}

/// The `n` latest transactions, newest first; same-day rows keep ledger order.
pub fn recent_transactions(view: &LedgerView<'_>, n: usize) -> Vec<RecentTransaction> {
    let mut rows: Vec<_> = view.iter().collect();
    rows.sort_by(|a, b| b.date().cmp(&a.date()));

    rows.into_iter()
        .take(n)
        .map(|t| RecentTransaction {
            transaction_id: t.id.clone(),
            transaction_date: t.date(),
            recipient_name: t.recipient_name.clone(),
            debit_cents: t.debit_cents,
            credit_cents: t.credit_cents,
        })
        .collect()
}

/// Annual target is twelve times the average of the months that ended with
/// positive savings. Progress is a percentage clamped to 0..=100.
pub fn savings_goal(view: &LedgerView<'_>, current_cents: i64) -> SavingsGoal {
    let mut monthly: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for t in view.iter() {
        *monthly.entry((t.year(), t.month_number())).or_insert(0) += t.net_cents();
    }

    let positive: Vec<i64> = monthly.into_values().filter(|s| *s > 0).collect();
    let average = if positive.is_empty() {
        0
    } else {
        positive.iter().sum::<i64>() / positive.len() as i64
    };
    let target_cents = average * 12;

    let progress = if target_cents > 0 {
        (current_cents as f64 / target_cents as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    SavingsGoal {
        current_cents,
        target_cents,
        progress,
    }
}

pub fn dashboard_analytics(view: &LedgerView<'_>) -> DashboardAnalytics {
    let summary = aggregator::totals(view);

    DashboardAnalytics {
        monthly_analysis: monthly_analysis(view),
        category_analysis: top_transaction_types(view, TOP_TYPES),
        recent_transactions: recent_transactions(view, RECENT_LIMIT),
        savings_goal: savings_goal(view, summary.balance_cents),
        summary,
    }
}
