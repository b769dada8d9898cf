use spendwise::config::Config;
use spendwise::server::{build_app, serve};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spendwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting Spendwise on {}", config.address());

    let host = config.host.clone();
    let port = config.port;

    let (_state, app) = match build_app(config) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let (actual_port, handle) = match serve(app, &host, port).await {
        Ok(served) => served,
        Err(e) => {
            tracing::error!("Failed to bind {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}:{}", host, actual_port);

    if let Err(e) = handle.await {
        tracing::error!("Server task failed: {}", e);
        std::process::exit(1);
    }
}
