//! Pipeline and approval routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use draftshield_pipeline::Receipt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/privacy/scrub", post(scrub))
        .route("/privacy/approve", post(approve))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrubRequest {
    event_id: Uuid,
    #[serde(default)]
    production_mode: bool,
    max_retries: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrubResponse {
    event_id: Uuid,
    clean_text: String,
    verification_passed: bool,
    semantic_risk: bool,
    gated: bool,
    approval_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval_token: Option<String>,
    receipt: Receipt,
}

async fn scrub(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrubRequest>,
) -> Result<Json<ScrubResponse>, ApiError> {
    let max_retries = req.max_retries.unwrap_or(state.config.max_retries);
    let verdict = state
        .pipeline
        .run(req.event_id, req.production_mode, max_retries)
        .await?;
    Ok(Json(ScrubResponse {
        event_id: verdict.event_id,
        clean_text: verdict.clean_text,
        verification_passed: verdict.verification_passed,
        semantic_risk: verdict.semantic_risk,
        gated: verdict.gated,
        approval_required: verdict.approval_required,
        approval_token: verdict.approval_token,
        receipt: verdict.receipt,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApproveRequest {
    event_id: Uuid,
    token: String,
}

async fn approve(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApproveRequest>,
) -> Json<serde_json::Value> {
    let allowed = state.boundary.present_token(&req.event_id, &req.token);
    Json(serde_json::json!({
        "eventId": req.event_id,
        "allowed": allowed,
    }))
}
