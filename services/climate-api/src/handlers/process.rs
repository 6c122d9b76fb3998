//! POST /process - run an extraction.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use climate_common::{ExtractionRequest, RequestError};
use extraction::{extract_data, ExtractionOutput};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use super::common::{error_response, internal_error, kind_response};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub download_link: String,
}

/// Parse the JSON body into a request.
///
/// A body that is not a non-empty JSON object is "no data"; absent, empty or
/// non-string fields are "missing".
pub fn parse_request(body: &[u8]) -> Result<ExtractionRequest, RequestError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::MissingBody)?;
    let object = match value.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return Err(RequestError::MissingBody),
    };
    let field = |name: &str| object.get(name).and_then(Value::as_str);

    ExtractionRequest::from_fields(
        field("country"),
        field("variable"),
        field("method"),
        field("area"),
    )
}

/// POST /process
pub async fn process_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("process", %request_id);

    let response = process(state, body).instrument(span).await;
    metrics::record_request("process", response.status().as_u16());
    response
}

async fn process(state: Arc<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected extraction request");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    info!(
        country = %request.country,
        variable = %request.variable,
        method = %request.method,
        area = ?request.area,
        "Processing request"
    );

    if let Err(e) = state.output.reset(&state.cleanup) {
        return internal_error(format!("failed to clean download directory: {e}"));
    }

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        extract_data(
            &request,
            &worker_state.catalog,
            &worker_state.loader,
            worker_state.output.path(),
        )
    })
    .await;

    match result {
        Ok(Ok(output)) => success(output),
        Ok(Err(e)) => kind_response(e.kind(), &e.to_string()),
        Err(e) => internal_error(format!("extraction task failed: {e}")),
    }
}

fn success(output: ExtractionOutput) -> Response {
    metrics::record_zones_skipped(output.skipped_zones.len());

    let Some(file_name) = output.file_name() else {
        return internal_error(format!("output path {} has no file name", output.path.display()));
    };
    let download_link = format!("/download/{file_name}");
    info!(%download_link, "Processing completed successfully");

    (StatusCode::OK, Json(ProcessResponse { download_link })).into_response()
}
