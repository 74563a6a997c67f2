use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/ext/openlibrary", get(open_library))
        .route("/api/ext/google-books", get(google_books))
}

pub async fn open_library(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ExtSearchQuery>,
) -> axum::response::Response {
    let q = query.query.unwrap_or_default();
    match services.gateway.search_open_library(&q, query.limit).await {
        Ok(hits) => (StatusCode::OK, Json(hits)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn google_books(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ExtSearchQuery>,
) -> axum::response::Response {
    let q = query.query.unwrap_or_default();
    match services.gateway.search_google_books(&q, query.max).await {
        Ok(hits) => (StatusCode::OK, Json(hits)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}
