//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout mirrors the rest of the workspace:
//! - `services.rs`: shared state (store, bus, gateway)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/query DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(Arc::new(services)))
        .layer(CorsLayer::permissive())
}
