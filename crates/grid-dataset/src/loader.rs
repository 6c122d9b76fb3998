//! Dataset path resolution and loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use climate_common::DATASET_EXTENSION;
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::GriddedDataset;
use crate::error::{DatasetError, DatasetResult};
use crate::reader::{default_reader, DatasetReader};

/// The (variable, method) pair that names a dataset file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DatasetKey {
    pub variable: String,
    pub method: String,
}

impl DatasetKey {
    pub fn new(variable: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            method: method.into(),
        }
    }

    /// `{variable}_{method}.nc`
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.variable, self.method, DATASET_EXTENSION)
    }

    /// Recover a key from a dataset file name, splitting on the last `_`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(&format!(".{DATASET_EXTENSION}"))?;
        let (variable, method) = stem.rsplit_once('_')?;
        if variable.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self::new(variable, method))
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.variable, self.method)
    }
}

/// Loads datasets from a data directory.
#[derive(Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
    reader: Arc<dyn DatasetReader>,
}

impl fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("data_dir", &self.data_dir)
            .finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// Loader using the reader compiled into this build.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_reader(data_dir, default_reader())
    }

    pub fn with_reader(data_dir: impl Into<PathBuf>, reader: Arc<dyn DatasetReader>) -> Self {
        Self {
            data_dir: data_dir.into(),
            reader,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, key: &DatasetKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Load `variable` from `{data_dir}/{variable}_{method}.nc`.
    pub fn load(&self, variable: &str, method: &str) -> DatasetResult<GriddedDataset> {
        let key = DatasetKey::new(variable, method);
        let path = self.path_for(&key);

        if !path.is_file() {
            return Err(DatasetError::NotFound(path));
        }

        let dataset = self.reader.read(&path, variable)?;
        info!(
            path = %path.display(),
            dims = %dataset.dims(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Datasets present in the data directory, sorted.
    pub fn list_datasets(&self) -> DatasetResult<Vec<DatasetKey>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match DatasetKey::from_file_name(name) {
                Some(key) => keys.push(key),
                None => debug!(file = name, "Ignoring non-dataset file"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
