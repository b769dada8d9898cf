//! Integration tests for the year/month/week selection cascade.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use serde_json::json;

#[tokio::test]
async fn test_months_need_a_year() {
    let client = TestClient::new();
    let (status, json) = client.get_json("/api/drilldown/months").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_months_for_year() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/drilldown/months?year=2024").await;

    assert_eq!(
        json,
        json!([
            {"number": 1, "name": "January"},
            {"number": 2, "name": "February"},
        ])
    );
}

#[tokio::test]
async fn test_weeks_for_month() {
    let client = TestClient::new();
    let (_, json) = client
        .get_json("/api/drilldown/weeks?year=2024&month=1")
        .await;
    assert_eq!(json, json!([1, 3]));

    let (_, json) = client
        .get_json("/api/drilldown/weeks?year=2023&month=12")
        .await;
    assert_eq!(json, json!([54]));
}

#[tokio::test]
async fn test_weeks_ignore_month_without_year() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/drilldown/weeks?month=1").await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_breakdown_without_year_is_empty() {
    let client = TestClient::new();
    let (status, json) = client.get_json("/api/breakdown").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "no_year");
    assert!(json["yearly"].is_null());
    assert!(json["monthly"].is_null());
    assert!(json["weekly"].is_null());
    assert!(json["daily"].is_null());
}

#[tokio::test]
async fn test_breakdown_year_groups_by_month() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/breakdown?year=2024").await;

    assert_eq!(json["stage"], "year_selected");
    let yearly = &json["yearly"];
    assert_eq!(yearly["title"], "Year 2024 Summary");
    assert_eq!(yearly["available"], true);
    assert_eq!(
        yearly["rows"],
        json!([
            {
                "group_key": "January",
                "total_debit_cents": 15_050,
                "total_credit_cents": 0,
                "balance_cents": -15_050,
                "transaction_count": 2
            },
            {
                "group_key": "February",
                "total_debit_cents": 25_000,
                "total_credit_cents": 500_000,
                "balance_cents": 475_000,
                "transaction_count": 2
            },
        ])
    );
    assert_eq!(json["months"].as_array().unwrap().len(), 2);
    assert!(json["monthly"].is_null());
}

#[tokio::test]
async fn test_breakdown_month_groups_by_week() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/breakdown?year=2024&month=1").await;

    assert_eq!(json["stage"], "month_selected");
    assert_eq!(json["weeks"], json!([1, 3]));
    let monthly = &json["monthly"];
    assert_eq!(monthly["title"], "January Summary");
    let keys: Vec<&str> = monthly["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["group_key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["Week 1", "Week 3"]);
}

#[tokio::test]
async fn test_breakdown_week_groups_by_day() {
    let client = TestClient::new();
    let (_, json) = client
        .get_json("/api/breakdown?year=2024&month=1&week=3")
        .await;

    assert_eq!(json["stage"], "week_selected");
    assert_eq!(json["weekly"]["title"], "Week 3 Summary");
    assert_eq!(json["daily"]["title"], "Daily Summary for Week 3");
    let rows = json["daily"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["group_key"], "2024-01-20");
    assert_eq!(rows[0]["total_debit_cents"], 5_050);
}

#[tokio::test]
async fn test_breakdown_week_without_month_is_ignored() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/breakdown?year=2024&week=3").await;

    assert_eq!(json["stage"], "year_selected");
    assert!(json["weekly"].is_null());
}

#[tokio::test]
async fn test_breakdown_invalid_values_mean_no_selection() {
    let client = TestClient::new();
    let (status, json) = client
        .get_json("/api/breakdown?year=abc&month=13")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "no_year");
}

#[tokio::test]
async fn test_breakdown_year_without_rows() {
    let client = TestClient::new();
    let (_, json) = client.get_json("/api/breakdown?year=2030").await;

    assert_eq!(json["months"], json!([]));
    assert_eq!(json["yearly"]["available"], true);
    assert_eq!(json["yearly"]["rows"], json!([]));
}
