use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/inventory", post(create_record))
        .route("/api/inventory/aggregate", get(aggregate))
}

pub async fn create_record(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateInventoryRequest>,
) -> axum::response::Response {
    let book_id = match errors::require_book_id(body.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let quantity = body.quantity.unwrap_or(0);
    let owner = body.owner_name.clone();
    let id = match services.catalog.create_inventory(body.into_record(book_id)).await {
        Ok(id) => id,
        Err(e) => return errors::store_error_to_response(e),
    };

    let title = services.catalog.book_title_or_id(book_id).await;
    let who = owner.as_deref().unwrap_or("Someone");
    services
        .notify(format!("{who} stocked \"{title}\" ({quantity} copies)"))
        .await;

    (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response()
}

pub async fn aggregate(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BookIdQuery>,
) -> axum::response::Response {
    let book_id = match errors::require_book_id(query.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.inventory_aggregate(book_id).await {
        Ok(agg) => (StatusCode::OK, Json(agg)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
