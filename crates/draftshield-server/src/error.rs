//! Error-to-HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use draftshield_core::Error;
use draftshield_draft::DraftRefusal;
use serde_json::json;

pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    detail: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let (status, code) = match &e {
            Error::InputTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "input_too_large"),
            Error::RetriesExhausted { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "retries_exhausted")
            }
            Error::ProductionBlocked => (StatusCode::CONFLICT, "production_blocked"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        Self {
            status,
            code,
            detail: e.to_string(),
        }
    }
}

impl From<DraftRefusal> for ApiError {
    fn from(r: DraftRefusal) -> Self {
        let (status, code) = match &r {
            DraftRefusal::NoVerdict => (StatusCode::NOT_FOUND, "no_verdict"),
            DraftRefusal::NotAnonymized => (StatusCode::FORBIDDEN, "not_anonymized"),
            DraftRefusal::ApprovalRequired => (StatusCode::FORBIDDEN, "approval_required"),
        };
        Self {
            status,
            code,
            detail: r.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "detail": self.detail,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                Error::InputTooLarge { len: 9, max: 1 }.into(),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                Error::RetriesExhausted { attempts: 3 }.into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::ProductionBlocked.into(), StatusCode::CONFLICT),
            (Error::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (DraftRefusal::ApprovalRequired.into(), StatusCode::FORBIDDEN),
            (DraftRefusal::NoVerdict.into(), StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status, expected);
        }
    }
}
