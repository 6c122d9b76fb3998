//! Common types shared across the climate extraction crates and services.

pub mod error;
pub mod request;

pub use error::{ErrorKind, RequestError};
pub use request::{normalize_country, AreaMode, ExtractionRequest, DATASET_EXTENSION};
