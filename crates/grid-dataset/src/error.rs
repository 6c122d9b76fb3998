//! Error types for dataset loading.

use std::path::PathBuf;

use climate_common::ErrorKind;
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("variable '{variable}' not found in {}", .path.display())]
    VariableNotFound { variable: String, path: PathBuf },

    #[error("missing coordinate: {0}")]
    MissingCoordinate(String),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid time axis: {0}")]
    InvalidTime(String),

    #[error("cannot read {}: built without NetCDF support", .0.display())]
    Unsupported(PathBuf),

    #[error("read error: {0}")]
    Read(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Unexpected,
        }
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for DatasetError {
    fn from(err: netcdf::Error) -> Self {
        DatasetError::Read(err.to_string())
    }
}
