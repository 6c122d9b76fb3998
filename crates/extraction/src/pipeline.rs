//! Whole-country and subregion extraction drivers.

use std::path::{Path, PathBuf};

use climate_common::{AreaMode, ExtractionRequest};
use grid_dataset::{DatasetLoader, GriddedDataset};
use rayon::prelude::*;
use region_catalog::{Region, RegionCatalog};
use tracing::{debug, error, info, warn};

use crate::aggregate::DailySeries;
use crate::archive::write_archive;
use crate::error::{ExtractionError, ExtractionResult};
use crate::mask::RegionMask;
use crate::table::ExtremeTable;

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutput {
    /// The CSV (whole country) or ZIP (subregions) to hand out.
    pub path: PathBuf,
    /// Number of region tables written.
    pub regions_written: usize,
    /// Zones left out of a subregion archive.
    pub skipped_zones: Vec<String>,
}

impl ExtractionOutput {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Runs extractions against a region catalog and a dataset directory,
/// writing into `download_dir`.
pub struct Extractor<'a> {
    catalog: &'a RegionCatalog,
    loader: &'a DatasetLoader,
    download_dir: &'a Path,
}

impl<'a> Extractor<'a> {
    pub fn new(catalog: &'a RegionCatalog, loader: &'a DatasetLoader, download_dir: &'a Path) -> Self {
        Self {
            catalog,
            loader,
            download_dir,
        }
    }

    pub fn run(&self, request: &ExtractionRequest) -> ExtractionResult<ExtractionOutput> {
        info!(
            country = %request.country,
            variable = %request.variable,
            method = %request.method,
            subregions = request.area.is_subregion(),
            "Processing extraction"
        );

        let result = match request.area {
            AreaMode::Country => {
                let region = self.catalog.country(&request.country)?;
                let dataset = self.loader.load(&request.variable, &request.method)?;
                self.whole_country(request, &region, &dataset)
            }
            AreaMode::Subregion => {
                let zones = self.catalog.zones(&request.country)?;
                let dataset = self.loader.load(&request.variable, &request.method)?;
                self.subregions(request, &zones, &dataset)
            }
        };

        if let Err(e) = &result {
            error!(country = %request.country, error = %e, "Extraction failed");
        }
        result
    }

    fn whole_country(
        &self,
        request: &ExtractionRequest,
        region: &Region,
        dataset: &GriddedDataset,
    ) -> ExtractionResult<ExtractionOutput> {
        let table = region_table(dataset, region, request.raw_column_name(None))?;

        std::fs::create_dir_all(self.download_dir)?;
        let path = self.download_dir.join(request.country_csv_name());
        table.write_csv(&path)?;
        info!(path = %path.display(), rows = table.row_count(), "Saved country data");

        Ok(ExtractionOutput {
            path,
            regions_written: 1,
            skipped_zones: Vec::new(),
        })
    }

    fn subregions(
        &self,
        request: &ExtractionRequest,
        zones: &[Region],
        dataset: &GriddedDataset,
    ) -> ExtractionResult<ExtractionOutput> {
        let tables: Vec<ExtractionResult<ExtremeTable>> = zones
            .par_iter()
            .map(|region| {
                let zone = region.zone.as_deref().unwrap_or_default();
                region_table(dataset, region, request.raw_column_name(Some(zone)))
            })
            .collect();

        let zone_dir = self.download_dir.join(&request.country);
        let mut written = Vec::new();
        let mut skipped = Vec::new();

        for (region, table) in zones.iter().zip(tables) {
            let zone = region.zone.as_deref().unwrap_or_default();
            let outcome = table.and_then(|table| {
                std::fs::create_dir_all(&zone_dir)?;
                let path = zone_dir.join(request.zone_csv_name(zone));
                table.write_csv(&path)?;
                Ok(path)
            });

            match outcome {
                Ok(path) => {
                    info!(path = %path.display(), zone, "Saved sub-region data");
                    written.push(path);
                }
                Err(ExtractionError::EmptySeries { .. }) => {
                    warn!(zone, "Data for subregion contains only missing values, skipping");
                    skipped.push(zone.to_string());
                }
                Err(e) => {
                    error!(zone, error = %e, "Error processing subregion");
                    skipped.push(zone.to_string());
                }
            }
        }

        if written.is_empty() {
            return Err(ExtractionError::NoValidSubregions);
        }

        let archive = self.download_dir.join(request.archive_name());
        write_archive(&archive, &written)?;
        info!(path = %archive.display(), files = written.len(), "Zipped sub-region files");

        Ok(ExtractionOutput {
            path: archive,
            regions_written: written.len(),
            skipped_zones: skipped,
        })
    }
}

/// Run `request` end to end. See [`Extractor`].
pub fn extract_data(
    request: &ExtractionRequest,
    catalog: &RegionCatalog,
    loader: &DatasetLoader,
    download_dir: &Path,
) -> ExtractionResult<ExtractionOutput> {
    Extractor::new(catalog, loader, download_dir).run(request)
}

/// Mask, reduce and tabulate one region.
fn region_table(
    dataset: &GriddedDataset,
    region: &Region,
    raw_column: String,
) -> ExtractionResult<ExtremeTable> {
    let mask = RegionMask::for_region(&region.geometry, dataset.lat(), dataset.lon());
    debug!(
        region = %region.label(),
        cells = mask.selected_count(),
        "Rasterized region mask"
    );

    let series = DailySeries::area_mean(dataset, &mask);
    if !series.has_valid() {
        return Err(ExtractionError::EmptySeries {
            region: region.label(),
        });
    }
    Ok(ExtremeTable::build(raw_column, series))
}
