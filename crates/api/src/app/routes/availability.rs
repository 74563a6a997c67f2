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
    Router::new().route("/api/availability", get(get_availability))
}

/// Merged supply/demand view; empty lists are a success, never an error.
pub async fn get_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BookIdQuery>,
) -> axum::response::Response {
    let book_id = match errors::require_book_id(query.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.availability(book_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
