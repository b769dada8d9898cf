use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error_pages::{error_page_middleware, fallback_handler};
use crate::handlers;
use crate::services::ledger_loader::{self, LedgerKind};
use crate::services::voice::AssistantSession;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// The primary ledger must load or startup fails. The categorized ledger is
/// optional: when it is missing or broken a warning is logged and the
/// category endpoints answer 404.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let ledger = ledger_loader::load(&config.ledger_path, LedgerKind::Primary)?;
    tracing::info!(
        path = %config.ledger_path.display(),
        transactions = ledger.len(),
        "Loaded ledger"
    );

    let category_ledger =
        match ledger_loader::load(&config.category_ledger_path, LedgerKind::Categorized) {
            Ok(ledger) => {
                tracing::info!(
                    path = %config.category_ledger_path.display(),
                    transactions = ledger.len(),
                    "Loaded categorized ledger"
                );
                Some(ledger)
            }
            Err(e) => {
                tracing::warn!(
                    path = %config.category_ledger_path.display(),
                    error = %e,
                    "Category data unavailable"
                );
                None
            }
        };

    let assistant = AssistantSession::from_config(config.voice.as_ref())?;
    if config.voice.is_none() {
        tracing::info!("Voice assistant not configured");
    }

    let state = AppState::new(config, ledger, category_ledger, assistant);
    let app = build_router(state.clone());

    Ok((state, app))
}

/// Assemble routes and the middleware stack around an existing state.
pub fn build_router(state: AppState) -> Router {
    let static_path = state.config.static_path.clone();

    Router::new()
        .merge(handlers::routes())
        .fallback(fallback_handler)
        .nest_service("/static", ServeDir::new(static_path))
        .layer(middleware::from_fn(error_page_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
