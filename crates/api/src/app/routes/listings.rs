use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bibloteka_catalog::NewListing;
use bibloteka_core::ListingKind;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/api/listings", get(list_listings).post(create_listing))
}

pub async fn create_listing(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateListingRequest>,
) -> axum::response::Response {
    let Some(raw_kind) = body.kind.clone() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "type and book_id required",
        );
    };
    let book_id = match errors::require_book_id(body.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let kind: ListingKind = match raw_kind.parse() {
        Ok(kind) => kind,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    let contact = body.contact();
    let listing = NewListing {
        kind,
        book_id,
        price: body.price,
        quantity: body.quantity,
        condition: body.condition,
        contact: contact.clone(),
    };
    let id = match services.catalog.create_listing(listing).await {
        Ok(id) => id,
        Err(e) => return errors::store_error_to_response(e),
    };

    let title = services.catalog.book_title_or_id(book_id).await;
    services
        .notify(format!(
            "{} {} \"{title}\"",
            contact.display_name(),
            kind.notification_verb()
        ))
        .await;

    (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response()
}

pub async fn list_listings(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BookIdQuery>,
) -> axum::response::Response {
    let book_id = query.book_id.filter(|id| *id > 0);
    match services.catalog.list_listings(book_id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
