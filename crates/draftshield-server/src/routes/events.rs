//! Raw event registration — the upstream collaborator surface.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use draftshield_core::Error;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/events", post(register_event))
}

#[derive(serde::Deserialize)]
struct EventInput {
    text: String,
    #[serde(default)]
    metadata: std::collections::BTreeMap<String, String>,
}

async fn register_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EventInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let len = input.text.chars().count();
    if len > state.config.max_input_chars {
        return Err(Error::InputTooLarge {
            len,
            max: state.config.max_input_chars,
        }
        .into());
    }
    let event_id = state.events.put_with_metadata(input.text, input.metadata);
    Ok(Json(serde_json::json!({ "eventId": event_id })))
}
