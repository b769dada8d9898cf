use axum::extract::State;
use axum::response::Json;

use crate::error::AppResult;
use crate::services::voice::SessionStatus;
use crate::state::AppState;

pub async fn start(State(state): State<AppState>) -> AppResult<Json<SessionStatus>> {
    Ok(Json(state.assistant.start().await?))
}

pub async fn stop(State(state): State<AppState>) -> AppResult<Json<SessionStatus>> {
    Ok(Json(state.assistant.stop().await?))
}

pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.assistant.status())
}
