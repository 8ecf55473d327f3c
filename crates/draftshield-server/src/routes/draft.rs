//! Drafting boundary route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use draftshield_draft::{DraftAccepted, DraftSubmission};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/draft", post(submit_draft))
}

async fn submit_draft(
    State(state): State<Arc<AppState>>,
    Json(sub): Json<DraftSubmission>,
) -> Result<Json<DraftAccepted>, ApiError> {
    let accepted = state.boundary.submit(&sub)?;
    Ok(Json(accepted))
}
