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
    Router::new().route("/api/comments", get(list_comments).post(create_comment))
}

pub async fn create_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCommentRequest>,
) -> axum::response::Response {
    let book_id = match errors::require_book_id(body.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(text) = body.text.clone().filter(|t| !t.trim().is_empty()) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "book_id and text required",
        );
    };

    let user = body.user_name.clone();
    let id = match services.catalog.create_comment(body.into_comment(book_id, text)).await {
        Ok(id) => id,
        Err(e) => return errors::store_error_to_response(e),
    };

    let title = services.catalog.book_title_or_id(book_id).await;
    let who = user.as_deref().unwrap_or("A reader");
    services.notify(format!("{who} commented on \"{title}\"")).await;

    (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response()
}

pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BookIdQuery>,
) -> axum::response::Response {
    let book_id = match errors::require_book_id(query.book_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.list_comments(book_id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
