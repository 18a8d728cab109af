//! HTTP surface for the two reports
//!
//! Provides:
//! - `GET /comments/?login=` comment attribution for one commentator
//! - `GET /general/?login=` daily activity for one user
//! - `GET /health`

pub mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;

use crate::report_core::ReportService;

/// State shared across handlers
pub struct AppState {
    pub service: ReportService,
    /// Upper bound for one report, store reads included
    pub request_timeout: Duration,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(service: ReportService, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }
}

/// Create the report router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/comments/", get(routes::comments))
        .route("/comments", get(routes::comments))
        .route("/general/", get(routes::general))
        .route("/general", get(routes::general))
        // Health check
        .route("/health", get(routes::health))
        .with_state(state)
}
