use std::str::FromStr;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::date_utils::{month_name, DateFilterable};
use crate::error::AppResult;
use crate::models::{
    Bucket, CounterpartyCount, Dimension, LedgerView, SummaryRow, Totals, TrendPoint,
};
use crate::services::aggregator;
use crate::services::categories::{self, CategoryBreakdown};
use crate::services::classifier::{self, TOP_COUNTERPARTIES};
use crate::services::drilldown::{self, MonthOption, Selection, Stage};
use crate::services::overview::{self, DashboardAnalytics};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateFilterable for DateRangeParams {
    fn start_date(&self) -> Option<&String> {
        self.start_date.as_ref()
    }

    fn end_date(&self) -> Option<&String> {
        self.end_date.as_ref()
    }
}

/// Drop-down values arrive as strings; an empty or unparsable value means
/// "nothing selected".
#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams {
    pub year: Option<String>,
    pub month: Option<String>,
    pub week: Option<String>,
}

impl SelectionParams {
    pub fn selection(&self) -> Selection {
        Selection::from_parts(
            parse_opt::<i32>(&self.year),
            parse_opt::<u32>(&self.month).filter(|m| (1..=12).contains(m)),
            parse_opt::<u32>(&self.week).filter(|w| *w >= 1),
        )
    }
}

fn parse_opt<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn filtered<'a>(state: &'a AppState, params: &DateRangeParams) -> LedgerView<'a> {
    match params.resolve_date_range(state.ledger.extent()) {
        Some(range) => state.ledger.between(&range),
        None => state.ledger.view(),
    }
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Json<Totals> {
    let view = filtered(&state, &params);
    Json(aggregator::totals(&view))
}

#[derive(Debug, Serialize)]
pub struct GeneralAnalysis {
    pub frequency: Vec<Bucket>,
    pub top_counterparties: Vec<CounterpartyCount>,
    pub amount_distribution: Vec<Bucket>,
    pub date_trend: Vec<TrendPoint>,
}

pub async fn general(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Json<GeneralAnalysis> {
    let view = filtered(&state, &params);
    debug!(row_count = view.len(), "Computing general analysis");

    Json(GeneralAnalysis {
        frequency: classifier::classify_by_frequency(&view),
        top_counterparties: classifier::top_counterparties(&view, TOP_COUNTERPARTIES),
        amount_distribution: classifier::classify_by_amount(&view),
        date_trend: aggregator::daily_debit_trend(&view),
    })
}

pub async fn months(
    State(state): State<AppState>,
    Query(params): Query<SelectionParams>,
) -> Json<Vec<MonthOption>> {
    let selection = params.selection();
    Json(drilldown::months_available(&state.ledger, selection.year()))
}

pub async fn weeks(
    State(state): State<AppState>,
    Query(params): Query<SelectionParams>,
) -> Json<Vec<u32>> {
    let selection = params.selection();
    Json(drilldown::weeks_available(
        &state.ledger,
        selection.year(),
        selection.month(),
    ))
}

#[derive(Debug, Serialize)]
pub struct SummaryChart {
    pub title: String,
    pub rows: Vec<SummaryRow>,
    pub available: bool,
}

/// Summarize for one chart. A failure is logged and rendered as an empty
/// chart so the other charts still show.
fn summary_chart(
    chart: &'static str,
    title: String,
    view: &LedgerView<'_>,
    group_by: Dimension,
) -> SummaryChart {
    match aggregator::summarize(view, group_by) {
        Ok(rows) => SummaryChart {
            title,
            rows,
            available: true,
        },
        Err(e) => {
            error!(chart, operation = "summarize", ?group_by, error = %e, "Chart computation failed");
            SummaryChart {
                title,
                rows: Vec::new(),
                available: false,
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Breakdown {
    pub stage: Stage,
    pub months: Vec<MonthOption>,
    pub weeks: Vec<u32>,
    pub yearly: Option<SummaryChart>,
    pub monthly: Option<SummaryChart>,
    pub weekly: Option<SummaryChart>,
    pub daily: Option<SummaryChart>,
}

pub async fn breakdown(
    State(state): State<AppState>,
    Query(params): Query<SelectionParams>,
) -> Json<Breakdown> {
    let selection = params.selection();
    let stage = selection.stage();
    let ledger = &state.ledger;
    debug!(?selection, ?stage, "Computing breakdown");

    let yearly = selection.year().map(|year| {
        let view = drilldown::period_view(ledger, &Selection::from_parts(Some(year), None, None));
        summary_chart(
            "yearly",
            format!("Year {} Summary", year),
            &view,
            Dimension::Month,
        )
    });

    let monthly = selection.month().map(|month| {
        let view = drilldown::period_view(
            ledger,
            &Selection::from_parts(selection.year(), Some(month), None),
        );
        summary_chart(
            "monthly",
            format!("{} Summary", month_name(month)),
            &view,
            Dimension::WeekNumber,
        )
    });

    let (weekly, daily) = match selection.week() {
        Some(week) => {
            let view = drilldown::period_view(ledger, &selection);
            (
                Some(summary_chart(
                    "weekly",
                    format!("Week {} Summary", week),
                    &view,
                    Dimension::Day,
                )),
                Some(summary_chart(
                    "daily",
                    format!("Daily Summary for Week {}", week),
                    &view,
                    Dimension::Day,
                )),
            )
        }
        None => (None, None),
    };

    Json(Breakdown {
        stage,
        months: drilldown::months_available(ledger, selection.year()),
        weeks: drilldown::weeks_available(ledger, selection.year(), selection.month()),
        yearly,
        monthly,
        weekly,
        daily,
    })
}

pub async fn analytics(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Json<DashboardAnalytics> {
    let view = filtered(&state, &params);
    Json(overview::dashboard_analytics(&view))
}

pub async fn category_breakdown(
    State(state): State<AppState>,
) -> AppResult<Json<CategoryBreakdown>> {
    let ledger = state.category_ledger()?;
    Ok(Json(categories::breakdown(&ledger.view())?))
}
