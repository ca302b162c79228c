//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ExtractionError;
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::routes::{
    extract_handler, get_extracted_data_handler, health_handler, history_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    /// Root token; every request runs under a child of it
    pub shutdown: CancellationToken,
    /// Include error details in 500 responses
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(deps: ServerDeps, shutdown: CancellationToken, expose_errors: bool) -> Self {
        Self {
            deps: Arc::new(deps),
            shutdown,
            expose_errors,
        }
    }

    pub fn api_error(&self, err: ExtractionError) -> ApiError {
        ApiError::from_extraction(err, self.expose_errors)
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/extract/history", post(history_handler))
        .route("/extract/:id", get(get_extracted_data_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
