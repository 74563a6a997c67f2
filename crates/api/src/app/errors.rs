//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bibloteka_catalog::StoreError;
use bibloteka_core::DomainError;
use bibloteka_gateway::GatewayError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map store failures: validation is the caller's fault, anything else is
/// ours.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        StoreError::Db(e) => {
            tracing::error!(error = %e, "catalog store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

/// Map gateway failures: upstream bad status is a 502 carrying the upstream
/// code, transport/decode trouble is a 500.
pub fn gateway_error_to_response(err: GatewayError) -> axum::response::Response {
    match err {
        GatewayError::BadStatus { provider, status } => (
            StatusCode::BAD_GATEWAY,
            axum::Json(json!({
                "error": "upstream_bad_status",
                "message": format!("{provider} bad status"),
                "status": status,
            })),
        )
            .into_response(),
        GatewayError::Transport { .. } => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream_error", err.to_string())
        }
    }
}

/// Extract a required positive `book_id` from an optional query value.
pub fn require_book_id(book_id: Option<i64>) -> Result<i64, axum::response::Response> {
    match book_id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "book_id required",
        )),
    }
}
