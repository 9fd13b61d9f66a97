//! HTTP route handlers
//!
//! Every page handler first resolves the tenant from the `domain` header;
//! a missing tenant short-circuits before any store access. Errors bubble
//! up as `Error` and are translated centrally (see `server::mod`).

use axum::{
    extract::{Extension, Json, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::server::{AppState, MessageBody};
use crate::store::PageDraft;
use crate::tenant::TenantId;

/// List all pages of the tenant
///
/// GET /pages
#[instrument(skip(state, headers))]
pub async fn list_pages(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response> {
    let tenant = TenantId::from_headers(&headers)?;
    let pages = state.store.list(&tenant).await?;
    info!(tenant = %tenant, count = pages.len(), "Listed pages");
    Ok(Json(pages).into_response())
}

/// Get a page by id
///
/// GET /pages/:id
#[instrument(skip(state, headers))]
pub async fn get_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let tenant = TenantId::from_headers(&headers)?;
    let page = state.store.get_by_id(&tenant, &id).await?;
    Ok(Json(page).into_response())
}

/// Get a page by slug
///
/// GET /pages/slug/:slug
#[instrument(skip(state, headers))]
pub async fn get_page_by_slug(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response> {
    let tenant = TenantId::from_headers(&headers)?;
    let page = state.store.get_by_slug(&tenant, &slug).await?;
    Ok(Json(page).into_response())
}

/// Create a page
///
/// POST /pages
/// Body: partial page, `title` and `content` required
#[instrument(skip(state, headers, body))]
pub async fn create_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<PageDraft>>,
) -> Result<Response> {
    let tenant = TenantId::from_headers(&headers)?;
    let Json(draft) = body.ok_or_else(|| {
        Error::InvalidDocument("request body must be a JSON object".to_string())
    })?;

    let page = state.store.create(&tenant, draft).await?;
    Ok((StatusCode::CREATED, Json(page)).into_response())
}

/// Delete a page by id
///
/// DELETE /pages/:id
#[instrument(skip(state, headers))]
pub async fn delete_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let tenant = TenantId::from_headers(&headers)?;
    state.store.delete(&tenant, &id).await?;
    Ok(Json(MessageBody::new("Page deleted successfully")).into_response())
}

/// Health check
///
/// GET /health
pub async fn health_check() -> Response {
    Json(serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(MessageBody::new("Not found"))).into_response()
}
