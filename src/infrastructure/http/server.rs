//! Search HTTP server.
//!
//! Exposes `POST /api/search` and `GET /health`. Client mistakes come back as
//! 400; every other failure is logged and reported as a generic 500 so that
//! upstream details never reach the caller.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::models::{ProductMatch, ServerConfig};
use crate::services::SearchService;

/// Body of `POST /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text query. Missing and blank are both rejected.
    #[serde(default)]
    pub query: Option<String>,
}

/// Error body. `status` mirrors the HTTP status code.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Message safe to show the caller.
    pub error: String,
    /// HTTP status code.
    pub status: u16,
}

impl ErrorResponse {
    fn reply(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                error: error.into(),
                status: status.as_u16(),
            }),
        )
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

struct AppState {
    search: Arc<SearchService>,
}

/// Build the router with tracing and, when enabled, permissive CORS.
pub fn build_router(search: Arc<SearchService>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState { search });

    let app = Router::new()
        .route("/api/search", post(search_products))
        .route("/health", get(health_check))
        .with_state(state);

    if config.enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Search HTTP server.
pub struct SearchHttpServer {
    config: ServerConfig,
    search: Arc<SearchService>,
}

impl SearchHttpServer {
    /// Create a server around a shared search service.
    pub fn new(search: Arc<SearchService>, config: ServerConfig) -> Self {
        Self { config, search }
    }

    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid listen address {}:{}",
                    self.config.host, self.config.port
                )
            })
    }

    /// Start the server and run until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = build_router(self.search, &self.config);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("search HTTP server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        tracing::info!("search HTTP server stopped");
        Ok(())
    }

    /// Start the server and run until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn search_products(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<ProductMatch>>, ApiError> {
    let span = tracing::info_span!("search_request", request_id = %Uuid::new_v4());

    async move {
        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "rejected search request body");
                return Err(ErrorResponse::reply(
                    StatusCode::BAD_REQUEST,
                    "Invalid request body",
                ));
            }
        };
        let query = request.query.unwrap_or_default();

        match state.search.search(&query).await {
            Ok(products) => Ok(Json(products)),
            Err(e) if e.is_client_error() => {
                tracing::debug!(error = %e, "rejected search query");
                Err(ErrorResponse::reply(
                    StatusCode::BAD_REQUEST,
                    "Query is required",
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, "search error");
                Err(ErrorResponse::reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                ))
            }
        }
    }
    .instrument(span)
    .await
}
