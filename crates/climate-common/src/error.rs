//! Error taxonomy for extraction requests.
//!
//! Every library error in the workspace classifies itself into one of three
//! kinds. The kind alone decides the HTTP status and whether the message may
//! be shown to the caller.

use thiserror::Error;

/// Coarse classification of a failed extraction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Country absent from the region catalog, or dataset file absent.
    NotFound,
    /// Masked data produced no usable series.
    InvalidResult,
    /// Anything else: I/O, malformed inputs, serialization failures.
    Unexpected,
}

impl ErrorKind {
    /// Get the HTTP status code for this kind of error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidResult => 400,
            ErrorKind::Unexpected => 500,
        }
    }

    /// Message safe to return to a caller.
    ///
    /// Unexpected failures are reported generically; their detail stays in
    /// the logs.
    pub fn public_message(&self, detail: &str) -> String {
        match self {
            ErrorKind::Unexpected => "Internal server error".to_string(),
            _ => detail.to_string(),
        }
    }
}

/// Validation failure for an incoming extraction request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("No JSON data provided")]
    MissingBody,

    #[error("Country, variable, method, and area are required!")]
    MissingField,
}
