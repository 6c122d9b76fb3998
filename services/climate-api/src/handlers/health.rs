//! Health and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub cleanup_status: String,
    pub pending_cleanup: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// GET /health - liveness plus the cleanup backlog
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let pending = state.cleanup.pending_count();
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Climate Data Extraction API is running".to_string(),
        cleanup_status: format!("{pending} files scheduled for cleanup"),
        pending_cleanup: pending,
        domain: state.config.public_domain.clone(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
