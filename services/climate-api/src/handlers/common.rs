//! Shared response helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use climate_common::ErrorKind;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"error": message}` with `status`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a classified failure to its response. Unexpected failures are
/// logged in full and reported generically.
pub fn kind_response(kind: ErrorKind, detail: &str) -> Response {
    let status = StatusCode::from_u16(kind.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if kind == ErrorKind::Unexpected {
        error!(error = %detail, "Unexpected failure");
    }
    error_response(status, kind.public_message(detail))
}

/// 500 with the generic message; `detail` goes to the log only.
pub fn internal_error(detail: impl std::fmt::Display) -> Response {
    kind_response(ErrorKind::Unexpected, &detail.to_string())
}
