//! Year → month → week cascade.
//!
//! Each query re-filters the full ledger; nothing is indexed ahead of time.
//! An unselected parent yields an empty list rather than an error.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{Ledger, LedgerView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub number: u32,
    pub name: &'static str,
}

/// Distinct years in the ledger, ascending.
pub fn years_available(ledger: &Ledger) -> Vec<i32> {
    ledger
        .transactions()
        .iter()
        .map(|t| t.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Months with at least one transaction in `year`, by month number.
pub fn months_available(ledger: &Ledger, year: Option<i32>) -> Vec<MonthOption> {
    let Some(year) = year else {
        return Vec::new();
    };

    ledger
        .transactions()
        .iter()
        .filter(|t| t.year() == year)
        .map(|t| (t.month_number(), t.month_name()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(number, name)| MonthOption { number, name })
        .collect()
}

/// Week numbers with at least one transaction in (`year`, `month`), ascending.
pub fn weeks_available(ledger: &Ledger, year: Option<i32>, month: Option<u32>) -> Vec<u32> {
    let (Some(year), Some(month)) = (year, month) else {
        return Vec::new();
    };

    ledger
        .transactions()
        .iter()
        .filter(|t| t.year() == year && t.month_number() == month)
        .map(|t| t.week_number())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NoYear,
    YearSelected,
    MonthSelected,
    WeekSelected,
}

/// Current year/month/week choice. Choosing a level clears every level
/// below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    year: Option<i32>,
    month: Option<u32>,
    week: Option<u32>,
}

impl Selection {
    /// Build from raw query values, dropping any level whose parent is unset.
    pub fn from_parts(year: Option<i32>, month: Option<u32>, week: Option<u32>) -> Self {
        let mut selection = Self::default();
        if let Some(year) = year {
            selection.select_year(year);
        }
        if let Some(month) = month {
            selection.select_month(month);
        }
        if let Some(week) = week {
            selection.select_week(week);
        }
        selection
    }

    pub fn select_year(&mut self, year: i32) {
        self.year = Some(year);
        self.month = None;
        self.week = None;
    }

    /// Ignored until a year is chosen.
    pub fn select_month(&mut self, month: u32) {
        if self.year.is_some() {
            self.month = Some(month);
            self.week = None;
        }
    }

    /// Ignored until a month is chosen.
    pub fn select_week(&mut self, week: u32) {
        if self.month.is_some() {
            self.week = Some(week);
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn week(&self) -> Option<u32> {
        self.week
    }

    pub fn stage(&self) -> Stage {
        match (self.year, self.month, self.week) {
            (None, _, _) => Stage::NoYear,
            (Some(_), None, _) => Stage::YearSelected,
            (Some(_), Some(_), None) => Stage::MonthSelected,
            (Some(_), Some(_), Some(_)) => Stage::WeekSelected,
        }
    }
}

/// Rows matching every selected level. Empty when no year is chosen.
pub fn period_view<'a>(ledger: &'a Ledger, selection: &Selection) -> LedgerView<'a> {
    let Selection { year, month, week } = *selection;
    ledger.view().filter(|t| {
        year.is_some_and(|y| t.year() == y)
            && month.map_or(true, |m| t.month_number() == m)
            && week.map_or(true, |w| t.week_number() == w)
    })
}
