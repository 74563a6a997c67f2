use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bibloteka_catalog::BookFilter;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/:id", axum::routing::delete(delete_book))
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BooksQuery>,
) -> axum::response::Response {
    let filter = BookFilter {
        query: query.query,
        with_inventory: dto::flag(query.with_inventory.as_deref()),
        only_in_stock: dto::flag(query.only_in_stock.as_deref()),
    };

    match services.catalog.list_books(filter).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateBookRequest>,
) -> axum::response::Response {
    let Some(title) = body.title.clone().filter(|t| !t.trim().is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "title required");
    };

    let id = match services.catalog.create_book(body.into_new_book(title.clone())).await {
        Ok(id) => id,
        Err(e) => return errors::store_error_to_response(e),
    };

    services.notify(format!("Added book \"{title}\"")).await;

    (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response()
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.catalog.delete_book(id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": id }))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "book not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
