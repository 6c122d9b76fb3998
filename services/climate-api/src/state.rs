//! Application state shared by the handlers.

use std::sync::Arc;

use grid_dataset::DatasetLoader;
use metrics_exporter_prometheus::PrometheusHandle;
use region_catalog::{CatalogError, RegionCatalog};

use crate::cleanup::CleanupRegistry;
use crate::config::ApiConfig;
use crate::output::OutputDir;

/// Shared application state.
pub struct AppState {
    pub config: ApiConfig,

    /// Region polygons, loaded once at startup.
    pub catalog: Arc<RegionCatalog>,

    /// Dataset access for the data directory.
    pub loader: DatasetLoader,

    pub output: OutputDir,

    /// Files awaiting delayed deletion.
    pub cleanup: CleanupRegistry,

    /// Prometheus recorder handle; `None` when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Assemble state from already loaded parts.
    pub fn new(config: ApiConfig, catalog: RegionCatalog, loader: DatasetLoader) -> Self {
        Self {
            output: OutputDir::new(&config.download_dir),
            cleanup: CleanupRegistry::new(config.cleanup_delay),
            catalog: Arc::new(catalog),
            loader,
            config,
            prometheus: None,
        }
    }

    /// Load the region catalog and use the compiled-in dataset reader.
    pub fn from_config(config: ApiConfig) -> Result<Self, CatalogError> {
        let catalog = RegionCatalog::from_path(&config.region_file)?;
        let loader = DatasetLoader::new(&config.data_dir);
        Ok(Self::new(config, catalog, loader))
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
