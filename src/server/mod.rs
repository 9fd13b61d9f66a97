//! HTTP server
//!
//! axum-based API layer. Handlers return `Result<_, Error>`; the single
//! `IntoResponse` adapter below translates error kinds to status codes and
//! the documented JSON message bodies, so no handler builds error responses
//! by hand. Storage failures are logged with full detail server-side and
//! reported to the client as an opaque 500.

pub mod handlers;
pub mod routes;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::error::Error;
use crate::store::PageStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: String,
    /// HTTP port
    pub http_port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0".to_string(),
            http_port: 4000,
            enable_cors: true,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub config: ServerConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}

/// Generic `{"message": ...}` body used by errors and confirmations.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingTenant => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidDocument(_) | Error::InvalidTitle(_) => StatusCode::BAD_REQUEST,
            Error::SlugConflict(_) => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Error::Storage(detail) => {
                // Internal detail stays in the log, never in the body.
                error!(error = %detail, "Storage failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(MessageBody::new(message))).into_response()
    }
}

/// Builds the application router. Shared by `start_server` and the tests.
pub fn app(state: AppState) -> Router {
    let enable_cors = state.config.enable_cors;

    let router = Router::new()
        .merge(routes::page_routes())
        .merge(routes::health_routes())
        .fallback(handlers::not_found)
        .layer(Extension(Arc::new(state)))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the pagecms HTTP server
pub async fn start_server(config: ServerConfig, store: PageStore) -> anyhow::Result<()> {
    info!(
        addr = %config.http_addr,
        port = config.http_port,
        "Starting pagecms HTTP server"
    );

    let addr = format!("{}:{}", config.http_addr, config.http_port);
    let state = AppState {
        store,
        config,
    };

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app(state)).await.map_err(|e| {
        error!(error = %e, "Server error");
        anyhow::anyhow!("Server failed: {}", e)
    })
}
