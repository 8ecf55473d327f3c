//! DraftShield — privacy-gating server for drafting from raw notes.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod eviction;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = draftshield_core::ShieldConfig::from_env();
    let port = config.port;

    let state = Arc::new(AppState::new(config)?);

    // Periodic TTL sweep over all stores
    eviction::start_eviction_worker(state.clone());

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DraftShield server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
