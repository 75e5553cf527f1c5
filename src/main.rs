use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use herald::routes::{self, AppState};
use herald::{Config, Dispatcher, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let store = MemoryStore::shared();
    let dispatcher = Arc::new(Dispatcher::from_config(&config.mail, store));

    // The front end is served from a different origin, so CORS stays open.
    let app = routes::router(AppState::new(dispatcher)).layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(port = config.port, "Backend running");

    axum::serve(listener, app).await?;

    Ok(())
}
