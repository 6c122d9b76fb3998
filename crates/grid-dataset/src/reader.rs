//! File-format backends for gridded datasets.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::dataset::GriddedDataset;
use crate::error::{DatasetError, DatasetResult};

/// Reads one variable of a dataset file into memory.
pub trait DatasetReader: Send + Sync {
    fn read(&self, path: &Path, variable: &str) -> DatasetResult<GriddedDataset>;
}

/// The reader compiled into this build: NetCDF when the `netcdf` feature is
/// on, otherwise a reader that rejects every file.
pub fn default_reader() -> Arc<dyn DatasetReader> {
    #[cfg(feature = "netcdf")]
    {
        Arc::new(crate::native::NetcdfReader::new())
    }
    #[cfg(not(feature = "netcdf"))]
    {
        Arc::new(UnsupportedReader)
    }
}

/// Reader used when no file backend is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedReader;

impl DatasetReader for UnsupportedReader {
    fn read(&self, path: &Path, _variable: &str) -> DatasetResult<GriddedDataset> {
        Err(DatasetError::Unsupported(path.to_path_buf()))
    }
}

/// Serves datasets held in memory, keyed by file name.
///
/// The file on disk still has to exist for the loader to reach the reader;
/// only its contents are replaced.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReader {
    datasets: HashMap<String, GriddedDataset>,
}

impl InMemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dataset` under `file_name` (e.g. `t2m_era5.nc`).
    pub fn with_dataset(mut self, file_name: impl Into<String>, dataset: GriddedDataset) -> Self {
        self.datasets.insert(file_name.into(), dataset);
        self
    }
}

impl DatasetReader for InMemoryReader {
    fn read(&self, path: &Path, variable: &str) -> DatasetResult<GriddedDataset> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        match self.datasets.get(file_name) {
            Some(ds) if ds.variable() == variable => Ok(ds.clone()),
            _ => Err(DatasetError::VariableNotFound {
                variable: variable.to_string(),
                path: path.to_path_buf(),
            }),
        }
    }
}
