//! Startup checks run before the server binds.
//!
//! Verifies that the configuration is coherent, the region catalog is
//! usable and the download directory can be created, and reports which
//! datasets are available.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("region catalog {path} contains no usable regions")]
    EmptyCatalog { path: String },

    #[error("cannot create download directory {path}: {source}")]
    DownloadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What startup validation found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StartupSummary {
    pub countries: usize,
    pub regions: usize,
    pub datasets: Vec<String>,
}

/// Check `state` and log a summary. Missing datasets only warn; a broken
/// catalog or download directory is fatal.
pub fn validate_startup(state: &AppState) -> Result<StartupSummary, StartupError> {
    state.config.validate()?;

    if state.catalog.is_empty() {
        return Err(StartupError::EmptyCatalog {
            path: state.config.region_file.display().to_string(),
        });
    }

    state
        .output
        .ensure()
        .map_err(|source| StartupError::DownloadDir {
            path: state.output.path().display().to_string(),
            source,
        })?;

    let datasets = match state.loader.list_datasets() {
        Ok(keys) => keys.iter().map(|k| k.to_string()).collect(),
        Err(e) => {
            warn!(
                data_dir = %state.config.data_dir.display(),
                error = %e,
                "Could not list datasets"
            );
            Vec::new()
        }
    };
    if datasets.is_empty() {
        warn!(data_dir = %state.config.data_dir.display(), "No datasets found");
    }

    let summary = StartupSummary {
        countries: state.catalog.countries().len(),
        regions: state.catalog.len(),
        datasets,
    };
    info!(
        countries = summary.countries,
        regions = summary.regions,
        datasets = ?summary.datasets,
        "Startup validation complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use grid_dataset::DatasetLoader;
    use region_catalog::RegionCatalog;
    use test_utils::{feature_collection, nordic_regions_geojson, TestLayout};

    fn state_for(layout: &TestLayout, geojson: &str) -> AppState {
        let config = ApiConfig::with_root(layout.root());
        let catalog = RegionCatalog::from_geojson_str(geojson).unwrap();
        let loader = DatasetLoader::new(&config.data_dir);
        AppState::new(config, catalog, loader)
    }

    #[test]
    fn test_summary_and_download_dir() {
        let layout = TestLayout::new();
        layout.touch_dataset("t2m", "era5");
        layout.touch_dataset("wind_speed", "cmip6");

        let state = state_for(&layout, &nordic_regions_geojson());
        let summary = validate_startup(&state).unwrap();

        assert_eq!(summary.countries, 2);
        assert_eq!(summary.regions, 6);
        assert_eq!(summary.datasets, vec!["t2m_era5", "wind_speed_cmip6"]);
        assert!(layout.download_dir().is_dir());
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let layout = TestLayout::new();
        let state = state_for(&layout, &feature_collection(Vec::new()));

        assert!(matches!(
            validate_startup(&state),
            Err(StartupError::EmptyCatalog { .. })
        ));
    }
}
