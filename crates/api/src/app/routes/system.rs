use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::errors;
use crate::app::services::{AppServices, APP_VERSION};

pub fn router() -> Router {
    Router::new().route("/api/diag", get(diag))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Version plus per-table row counts, for a quick "is the store alive" look.
pub async fn diag(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.table_counts().await {
        Ok(counts) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "version": APP_VERSION,
                "db": counts,
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
