//! POST /cleanup - wipe the download directory.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

use super::common::internal_error;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
}

/// POST /cleanup
pub async fn cleanup_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let response = match state.output.reset(&state.cleanup) {
        Ok(()) => (
            StatusCode::OK,
            Json(CleanupResponse {
                message: "Download directory cleaned successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => internal_error(format!("error in manual cleanup: {e}")),
    };
    metrics::record_request("cleanup", response.status().as_u16());
    response
}
