//! Error types for region catalog operations.

use std::path::PathBuf;

use climate_common::ErrorKind;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading or querying the region catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The region file could not be read.
    #[error("failed to read region file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The region file is not a valid GeoJSON feature collection.
    #[error("invalid region file: {0}")]
    Parse(String),

    /// No feature matches the requested country.
    #[error("Country '{0}' not found in the region catalog.")]
    CountryNotFound(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::CountryNotFound(_) => ErrorKind::NotFound,
            CatalogError::Io { .. } | CatalogError::Parse(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
