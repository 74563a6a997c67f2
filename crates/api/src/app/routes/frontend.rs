//! Static frontend: one page, one script, both compiled into the binary.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

const INDEX_HTML: &str = include_str!("../../../public/index.html");
const APP_JS: &str = include_str!("../../../public/static/js/app.js");

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/js/app.js", get(app_js))
}

pub async fn index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
        ],
        INDEX_HTML,
    )
}

pub async fn app_js() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
        ],
        APP_JS,
    )
}
