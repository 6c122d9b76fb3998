//! Error types for the extraction pipeline.

use climate_common::ErrorKind;
use grid_dataset::DatasetError;
use region_catalog::CatalogError;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Every masked value is missing.
    #[error("Masked data for '{region}' contains only missing values. Check the geometry and dataset alignment.")]
    EmptySeries { region: String },

    #[error("No valid subregions were processed successfully.")]
    NoValidSubregions,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Catalog(e) => e.kind(),
            ExtractionError::Dataset(e) => e.kind(),
            ExtractionError::EmptySeries { .. } | ExtractionError::NoValidSubregions => {
                ErrorKind::InvalidResult
            }
            ExtractionError::Io(_) | ExtractionError::Csv(_) | ExtractionError::Zip(_) => {
                ErrorKind::Unexpected
            }
        }
    }
}
