//! GET /download/:filename - serve a generated file and schedule its deletion.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Path as UrlPath},
    http::{header, StatusCode},
    response::Response,
};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use super::common::{error_response, internal_error};
use crate::metrics;
use crate::state::AppState;

/// Content type by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => "text/csv",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// GET /download/:filename
pub async fn download_handler(
    Extension(state): Extension<Arc<AppState>>,
    UrlPath(filename): UrlPath<String>,
) -> Response {
    let response = download(&state, &filename).await;
    metrics::record_request("download", response.status().as_u16());
    response
}

async fn download(state: &AppState, filename: &str) -> Response {
    let Some(path) = state.output.resolve(filename) else {
        warn!(filename, "Rejected download filename");
        return error_response(StatusCode::BAD_REQUEST, "Invalid filename");
    };

    info!(path = %path.display(), "Attempting to serve file");

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "File not found");
            return error_response(StatusCode::NOT_FOUND, "File not found!");
        }
        Err(e) => return internal_error(format!("failed to open {}: {e}", path.display())),
    };

    let length = match file.metadata().await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "File not found!"),
        Err(e) => return internal_error(format!("failed to stat {}: {e}", path.display())),
    };

    state.cleanup.schedule(path.clone());

    let body = Body::from_stream(ReaderStream::new(file));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&path))
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(body)
        .unwrap_or_else(|e| internal_error(format!("failed to build response: {e}")))
}
