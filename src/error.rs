use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::error_pages::ErrorMessage;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to load {source_name}: {cause}")]
    Load { source_name: String, cause: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Voice assistant error: {0}")]
    Voice(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Schema(_) | AppError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Voice(_) => StatusCode::BAD_GATEWAY,
            AppError::Load { .. }
            | AppError::Csv(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user. Server-side failures are logged and replaced
    /// by a generic text.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Schema(msg)
            | AppError::Parse(msg)
            | AppError::Voice(msg) => msg.clone(),
            AppError::Load { source_name, cause } => {
                tracing::error!(source = %source_name, %cause, "Ledger load error");
                format!("Failed to load {}", source_name)
            }
            AppError::Csv(e) => {
                tracing::error!("CSV error: {:?}", e);
                "CSV error".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                "IO error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        let html = format!(
            r#"<div class="alert alert-error">
                <p>{}</p>
            </div>"#,
            html_escape(&message)
        );

        let mut response = (status, Html(html)).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub type AppResult<T> = Result<T, AppError>;

pub trait RenderHtml {
    fn render_html(self) -> AppResult<Html<String>>;
}

impl<T: Template> RenderHtml for T {
    fn render_html(self) -> AppResult<Html<String>> {
        self.render()
            .map(Html)
            .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
    }
}
