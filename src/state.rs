use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Ledger;
use crate::services::voice::AssistantSession;

/// Assistant session shared by the voice handlers. The session guards its
/// own state, so readers never wait on a call to the assistant service.
pub type SharedAssistant = Arc<AssistantSession>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<Ledger>,
    pub category_ledger: Option<Arc<Ledger>>,
    pub assistant: SharedAssistant,
}

impl AppState {
    pub fn new(
        config: Config,
        ledger: Ledger,
        category_ledger: Option<Ledger>,
        assistant: AssistantSession,
    ) -> Self {
        Self {
            config: Arc::new(config),
            ledger: Arc::new(ledger),
            category_ledger: category_ledger.map(Arc::new),
            assistant: Arc::new(assistant),
        }
    }

    pub fn category_ledger(&self) -> AppResult<&Ledger> {
        self.category_ledger
            .as_deref()
            .ok_or_else(|| AppError::NotFound("Category data is not available".into()))
    }
}
