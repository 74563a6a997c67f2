use axum::Router;

pub mod availability;
pub mod books;
pub mod comments;
pub mod ext;
pub mod frontend;
pub mod inventory;
pub mod listings;
pub mod notifications;
pub mod system;

/// Router for the whole public surface (one module per domain area).
pub fn router() -> Router {
    Router::new()
        .merge(frontend::router())
        .merge(system::router())
        .merge(books::router())
        .merge(inventory::router())
        .merge(listings::router())
        .merge(comments::router())
        .merge(availability::router())
        .merge(ext::router())
        .merge(notifications::router())
}
