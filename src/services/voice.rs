use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::VoiceConfig;
use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote conversational assistant that can open and close calls.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Open a call with the assistant and return its call id.
    async fn start(&self, assistant_id: &str) -> AppResult<String>;

    async fn stop(&self, call_id: &str) -> AppResult<()>;

    /// Whether `stop` hangs up the call on the assistant service, or only
    /// leaves it locally.
    fn ends_remote_call(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Starting,
    Active { call_id: String },
    Stopping { call_id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub state: SessionState,
    pub configured: bool,
    /// False when stopping only ends the local session and the assistant
    /// service closes the call on its own.
    pub stop_ends_remote_call: bool,
}

/// One assistant conversation slot, owned by the application state.
///
/// The state lock is only held to read or switch states, never across a
/// backend call, so status reads do not wait on the assistant service.
pub struct AssistantSession {
    backend: Option<Box<dyn AssistantBackend>>,
    assistant_id: Option<String>,
    state: Mutex<SessionState>,
}

impl AssistantSession {
    pub fn new(backend: Box<dyn AssistantBackend>, assistant_id: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            assistant_id: Some(assistant_id.into()),
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// A session with no backend; `start` always fails.
    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            assistant_id: None,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn from_config(config: Option<&VoiceConfig>) -> AppResult<Self> {
        match config {
            Some(voice) => Ok(Self::new(
                Box::new(HttpAssistant::new(&voice.api_url, &voice.api_key)?),
                voice.assistant_id.clone(),
            )),
            None => {
                warn!("Voice assistant not configured; start requests will be rejected");
                Ok(Self::unconfigured())
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) -> SessionStatus {
        *self.state() = state;
        self.status()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state().clone(),
            configured: self.backend.is_some(),
            stop_ends_remote_call: self
                .backend
                .as_ref()
                .is_some_and(|backend| backend.ends_remote_call()),
        }
    }

    pub async fn start(&self) -> AppResult<SessionStatus> {
        let (Some(backend), Some(assistant_id)) = (&self.backend, &self.assistant_id) else {
            return Err(AppError::Validation(
                "Voice assistant is not configured".into(),
            ));
        };

        {
            let mut state = self.state();
            if *state != SessionState::Idle {
                return Err(AppError::Validation(
                    "Assistant is already listening".into(),
                ));
            }
            *state = SessionState::Starting;
        }

        match backend.start(assistant_id).await {
            Ok(call_id) => {
                info!(%call_id, "Assistant call started");
                Ok(self.set_state(SessionState::Active { call_id }))
            }
            Err(e) => {
                self.set_state(SessionState::Idle);
                Err(e)
            }
        }
    }

    pub async fn stop(&self) -> AppResult<SessionStatus> {
        let call_id = {
            let mut state = self.state();
            let SessionState::Active { call_id } = &*state else {
                return Err(AppError::Validation(
                    "Assistant is not currently running".into(),
                ));
            };
            let call_id = call_id.clone();
            *state = SessionState::Stopping {
                call_id: call_id.clone(),
            };
            call_id
        };

        if let Some(backend) = &self.backend {
            if let Err(e) = backend.stop(&call_id).await {
                self.set_state(SessionState::Active { call_id });
                return Err(e);
            }
        }
        info!(%call_id, "Assistant call stopped");
        Ok(self.set_state(SessionState::Idle))
    }
}

/// Web-call client for a hosted voice assistant API.
pub struct HttpAssistant {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartCallRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct StartCallResponse {
    id: String,
}

impl HttpAssistant {
    pub fn new(base_url: &str, api_key: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl AssistantBackend for HttpAssistant {
    async fn start(&self, assistant_id: &str) -> AppResult<String> {
        let url = format!("{}/call/web", self.base_url);
        debug!(%url, "Starting assistant call");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&StartCallRequest { assistant_id })
            .send()
            .await
            .map_err(|e| AppError::Voice(format!("Failed to start assistant: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Voice(format!(
                "Failed to start assistant: API returned {}: {}",
                status, body
            )));
        }

        let call: StartCallResponse = response
            .json()
            .await
            .map_err(|e| AppError::Voice(format!("Failed to parse response: {}", e)))?;
        Ok(call.id)
    }

    async fn stop(&self, call_id: &str) -> AppResult<()> {
        // Web calls end when the client leaves; only the local state changes.
        debug!(%call_id, "Leaving assistant call");
        Ok(())
    }

    fn ends_remote_call(&self) -> bool {
        false
    }
}
