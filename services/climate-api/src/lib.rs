//! Climate data extraction service library.
//!
//! Exposes the router and its building blocks so integration tests can
//! drive the service without binding a socket.

pub mod cleanup;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod output;
pub mod startup_validation;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        // Landing page
        .route("/", get(handlers::landing::landing_handler))
        // Extraction
        .route("/process", post(handlers::process::process_handler))
        .route("/download/:filename", get(handlers::download::download_handler))
        .route("/cleanup", post(handlers::cleanup::cleanup_handler))
        // Landing page data
        .route("/api/countries", get(handlers::api::countries_handler))
        .route("/api/datasets", get(handlers::api::datasets_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler));

    if let Some(dir) = &state.config.static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
