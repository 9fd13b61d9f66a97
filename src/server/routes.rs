//! HTTP routes definition

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Page routes, all tenant-scoped via the `domain` header:
/// - GET    /pages            - List the tenant's pages
/// - POST   /pages            - Create a page (title + content required)
/// - GET    /pages/:id        - Get a page by id
/// - DELETE /pages/:id        - Delete a page by id
/// - GET    /pages/slug/:slug - Get a page by slug
pub fn page_routes() -> Router {
    Router::new()
        .route("/pages", get(handlers::list_pages))
        .route("/pages", post(handlers::create_page))
        .route("/pages/:id", get(handlers::get_page))
        .route("/pages/:id", delete(handlers::delete_page))
        .route("/pages/slug/:slug", get(handlers::get_page_by_slug))
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health_check))
}
