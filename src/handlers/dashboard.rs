use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use tracing::debug;

use crate::date_utils::{DateFilterable, DateRange};
use crate::error::{AppResult, RenderHtml};
use crate::handlers::api::DateRangeParams;
use crate::services::aggregator::{self, format_cents};
use crate::services::drilldown;
use crate::state::AppState;
use crate::VERSION;

/// One of the coloured boxes at the top of the dashboard.
pub struct SummaryBox {
    pub id: &'static str,
    pub title: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub range_label: String,
    pub start_date: String,
    pub end_date: String,
    pub query_string: String,
    pub summary_boxes: Vec<SummaryBox>,
    pub years: Vec<i32>,
    pub has_categories: bool,
    pub voice_configured: bool,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Html<String>> {
    debug!("Loading dashboard");
    let ledger = &state.ledger;

    let range = params.resolve_date_range(ledger.extent());
    let view = match &range {
        Some(range) => ledger.between(range),
        None => ledger.view(),
    };
    let totals = aggregator::totals(&view);

    let summary_boxes = vec![
        SummaryBox {
            id: "income",
            title: "Income",
            value: format!("₹{}", format_cents(totals.income_cents)),
        },
        SummaryBox {
            id: "expenditure",
            title: "Expenditure",
            value: format!("₹{}", format_cents(totals.expenditure_cents)),
        },
        SummaryBox {
            id: "balance",
            title: "Balance",
            value: format!("₹{}", format_cents(totals.balance_cents)),
        },
        SummaryBox {
            id: "count",
            title: "Total Transactions",
            value: totals.transaction_count.to_string(),
        },
    ];

    debug!(
        transaction_count = totals.transaction_count,
        income_cents = totals.income_cents,
        expenditure_cents = totals.expenditure_cents,
        "Dashboard data loaded"
    );

    let template = DashboardTemplate {
        title: "Dashboard".into(),
        version: VERSION,
        range_label: range
            .as_ref()
            .map(DateRange::display_label)
            .unwrap_or_else(|| "No transactions".into()),
        start_date: range.as_ref().map(DateRange::start_str).unwrap_or_default(),
        end_date: range.as_ref().map(DateRange::end_str).unwrap_or_default(),
        query_string: range
            .as_ref()
            .map(DateRange::query_string)
            .unwrap_or_default(),
        summary_boxes,
        years: drilldown::years_available(ledger),
        has_categories: state.category_ledger.is_some(),
        voice_configured: state.config.voice.is_some(),
    };

    template.render_html()
}
