//! # docslide-api
//!
//! HTTP adapter for docslide: multipart upload handling, text ingestion,
//! prompt rendering and envelope responses.
//!
//! ```text
//! POST /api/ai   multipart: operation, file?, text?, question?, insights?, provider?
//! GET  /health
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod ingestion;
pub mod templates;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use docslide_inference::{Orchestrator, OutputValidator};

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Re-checks successful provider data before it is returned.
    pub validator: OutputValidator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, validator: OutputValidator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            validator,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/ai", post(handlers::ai::run_operation))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        // Multipart uploads are bounded by the layer below, not axum's 2 MB default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
