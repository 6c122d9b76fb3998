//! Temporary directory layouts for tests.

use std::path::{Path, PathBuf};

/// Creates a temporary directory with a specific prefix.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// A temporary `data/` + `download/` pair, as the service lays them out.
pub struct TestLayout {
    root: tempfile::TempDir,
}

impl TestLayout {
    /// Create the layout with an empty `data/` directory. `download/` is
    /// left for the code under test to create.
    pub fn new() -> Self {
        let root = temp_test_dir_with_prefix("climate_test");
        std::fs::create_dir_all(root.path().join("data")).expect("Failed to create data dir");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn download_dir(&self) -> PathBuf {
        self.root.path().join("download")
    }

    /// Path of the region file inside `data/`.
    pub fn region_file(&self) -> PathBuf {
        self.data_dir().join(crate::REGION_FILE_NAME)
    }

    /// Write `geojson` as the region file.
    pub fn write_region_file(&self, geojson: &str) -> PathBuf {
        let path = self.region_file();
        std::fs::write(&path, geojson).expect("Failed to write region file");
        path
    }

    /// Create an empty `{variable}_{method}.nc` so the loader finds a file.
    ///
    /// Contents come from an in-memory reader in tests.
    pub fn touch_dataset(&self, variable: &str, method: &str) -> PathBuf {
        let path = self.data_dir().join(format!("{variable}_{method}.nc"));
        std::fs::write(&path, b"").expect("Failed to create dataset placeholder");
        path
    }
}

impl Default for TestLayout {
    fn default() -> Self {
        Self::new()
    }
}
