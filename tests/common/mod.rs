//! Shared test utilities for integration tests.
//!
//! `TestClient` builds the full router over ledgers parsed from in-memory CSV
//! text, so requests run through the same middleware as production.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use spendwise::config::{Config, VoiceConfig};
use spendwise::error::{AppError, AppResult};
use spendwise::server::build_router;
use spendwise::services::ledger_loader::{parse_ledger, LedgerKind};
use spendwise::services::voice::{AssistantBackend, AssistantSession};
use spendwise::state::AppState;
use tower::ServiceExt;

/// Five transactions over two years. Week numbers (Sunday-start, 1-based):
/// 2023-12-31 is week 54, 2024-01-05 week 1, 2024-01-20 week 3,
/// 2024-02-01 week 5, 2024-02-14 week 7.
pub const LEDGER_CSV: &str = "\
Transaction_ID,Transaction_Date,Debit,Credit,Balance,Recipient_Name,Transaction_Type
T5,2023-12-31,20.00,0,980.00,Cafe,UPI
T1,2024-01-05,100.00,0,880.00,Grocer,UPI
T2,2024-01-20,50.50,0,829.50,Grocer,CARD
T3,2024-02-01,,5000.00,5829.50,Employer,NEFT
T4,2024-02-14,250.00,0,5579.50,Cafe,UPI
";

pub const CATEGORY_CSV: &str = "\
Transaction_ID,Transaction_Date,Debit,Transaction_Category,Sub_Category
C1,2024-01-05,100.00,Food,Groceries
C2,2024-01-20,50.00,Food,
C3,2024-02-14,300.00,Rent,Housing
";

/// Backend that hands out predictable call ids and records stops.
#[derive(Default, Clone)]
pub struct FakeAssistant {
    pub stopped: Arc<Mutex<Vec<String>>>,
    pub fail_start: bool,
    pub start_delay: Option<Duration>,
}

#[async_trait]
impl AssistantBackend for FakeAssistant {
    async fn start(&self, assistant_id: &str) -> AppResult<String> {
        if let Some(delay) = self.start_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_start {
            return Err(AppError::Voice("assistant unreachable".into()));
        }
        Ok(format!("call-{}", assistant_id))
    }

    async fn stop(&self, call_id: &str) -> AppResult<()> {
        self.stopped.lock().unwrap().push(call_id.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Client over the default ledger with category data and no voice assistant.
    pub fn new() -> Self {
        Self::with_ledgers(LEDGER_CSV, Some(CATEGORY_CSV))
    }

    pub fn with_ledgers(primary: &str, categorized: Option<&str>) -> Self {
        Self::build(primary, categorized, AssistantSession::unconfigured(), None)
    }

    pub fn with_assistant(assistant: FakeAssistant) -> Self {
        let voice = VoiceConfig {
            api_url: "http://assistant.invalid".into(),
            api_key: "test-key".into(),
            assistant_id: "asst-1".into(),
        };
        Self::build(
            LEDGER_CSV,
            Some(CATEGORY_CSV),
            AssistantSession::new(Box::new(assistant), "asst-1"),
            Some(voice),
        )
    }

    fn build(
        primary: &str,
        categorized: Option<&str>,
        assistant: AssistantSession,
        voice: Option<VoiceConfig>,
    ) -> Self {
        let ledger = parse_ledger(primary.as_bytes(), LedgerKind::Primary)
            .expect("Failed to parse test ledger");
        let category_ledger = categorized.map(|csv| {
            parse_ledger(csv.as_bytes(), LedgerKind::Categorized)
                .expect("Failed to parse test category ledger")
        });

        let config = Config {
            host: "127.0.0.1".into(),
            port: 8060,
            ledger_path: PathBuf::from("unused.csv"),
            category_ledger_path: PathBuf::from("unused_categories.csv"),
            static_path: PathBuf::from("static"),
            voice,
        };

        let state = AppState::new(config, ledger, category_ledger, assistant);
        Self { state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(&self, method: &str, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send("GET", uri).await
    }

    /// Make a body-less POST request and return status and body.
    pub async fn post(&self, uri: &str) -> (StatusCode, String) {
        self.send("POST", uri).await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }

    pub async fn post_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.post(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }
}
