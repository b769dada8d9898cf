use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::date_utils::month_name;
use crate::error::{AppError, AppResult};
use crate::models::LedgerView;

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount_cents: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcategorySpending {
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySpending {
    pub month: &'static str,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub by_category: Vec<CategorySpending>,
    pub by_subcategory: Vec<SubcategorySpending>,
    pub by_month: Vec<MonthlySpending>,
}

fn require_categories(view: &LedgerView<'_>) -> AppResult<()> {
    if view.schema().category {
        Ok(())
    } else {
        Err(AppError::Schema(
            "Column Transaction_Category not present in ledger".into(),
        ))
    }
}

fn category_of(category: Option<&str>) -> String {
    category.unwrap_or(UNCATEGORIZED).to_string()
}

/// Debit spending per category, largest first.
pub fn by_category(view: &LedgerView<'_>) -> AppResult<Vec<CategorySpending>> {
    require_categories(view)?;

    let mut totals: HashMap<String, i64> = HashMap::new();
    for transaction in view.iter() {
        *totals
            .entry(category_of(transaction.category.as_deref()))
            .or_insert(0) += transaction.debit_cents;
    }

    let total: i64 = totals.values().sum();

    let mut result: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, amount_cents)| CategorySpending {
            category,
            amount_cents,
            percentage: if total > 0 {
                (amount_cents as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    result.sort_by(|a, b| {
        b.amount_cents
            .cmp(&a.amount_cents)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(result)
}

/// Debit spending per (category, subcategory), ordered by both names.
pub fn by_subcategory(view: &LedgerView<'_>) -> AppResult<Vec<SubcategorySpending>> {
    require_categories(view)?;

    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for transaction in view.iter() {
        let key = (
            category_of(transaction.category.as_deref()),
            category_of(transaction.subcategory.as_deref()),
        );
        *totals.entry(key).or_insert(0) += transaction.debit_cents;
    }

    Ok(totals
        .into_iter()
        .map(|((category, subcategory), amount_cents)| SubcategorySpending {
            category,
            subcategory,
            amount_cents,
        })
        .collect())
}

/// Debit spending per calendar month, January first.
pub fn by_month(view: &LedgerView<'_>) -> Vec<MonthlySpending> {
    let mut totals: BTreeMap<u32, i64> = BTreeMap::new();
    for transaction in view.iter() {
        *totals.entry(transaction.month_number()).or_insert(0) += transaction.debit_cents;
    }

    totals
        .into_iter()
        .map(|(month, amount_cents)| MonthlySpending {
            month: month_name(month),
            amount_cents,
        })
        .collect()
}

pub fn breakdown(view: &LedgerView<'_>) -> AppResult<CategoryBreakdown> {
    Ok(CategoryBreakdown {
        by_category: by_category(view)?,
        by_subcategory: by_subcategory(view)?,
        by_month: by_month(view),
    })
}
