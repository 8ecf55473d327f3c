//! HTTP route handlers.

pub mod draft;
pub mod events;
pub mod privacy;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(privacy::routes())
        .merge(draft::routes())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
