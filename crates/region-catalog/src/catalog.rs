//! In-memory region catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use climate_common::normalize_country;
use geo::MultiPolygon;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::geojson::RegionFeatureCollection;

/// A named region with its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Lower-cased country name.
    pub country: String,
    /// Zone name for subregions; `None` for a whole-country region.
    pub zone: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    /// Human-readable label used in log messages.
    pub fn label(&self) -> String {
        match &self.zone {
            Some(zone) => format!("{}/{}", self.country, zone),
            None => self.country.clone(),
        }
    }
}

/// Country entry returned by [`RegionCatalog::countries`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountrySummary {
    pub name: String,
    pub zones: usize,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    country: String,
    zone: Option<String>,
    geometry: MultiPolygon<f64>,
}

/// Region polygons indexed by lower-cased country name.
///
/// Entries keep the order of the source file; "first" below always means
/// first in file order.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    entries: Vec<CatalogEntry>,
}

impl RegionCatalog {
    /// Load the catalog from a GeoJSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_geojson_str(&text)?;
        info!(
            path = %path.display(),
            features = catalog.len(),
            "Loaded region catalog"
        );
        Ok(catalog)
    }

    /// Parse the catalog from GeoJSON text.
    pub fn from_geojson_str(text: &str) -> CatalogResult<Self> {
        let collection: RegionFeatureCollection = serde_json::from_str(text)?;
        Ok(Self::from_collection(collection))
    }

    /// Build the catalog from an already parsed feature collection.
    ///
    /// Features without a `countryName` or without an areal geometry are
    /// dropped.
    pub fn from_collection(collection: RegionFeatureCollection) -> Self {
        let mut entries = Vec::with_capacity(collection.features.len());

        for (index, feature) in collection.features.iter().enumerate() {
            let Some(country) = feature.country_name() else {
                debug!(index, "Skipping feature without countryName");
                continue;
            };
            let Some(geometry) = feature.geometry.as_ref().and_then(|g| g.to_multi_polygon())
            else {
                warn!(index, country, "Skipping feature without polygon geometry");
                continue;
            };
            entries.push(CatalogEntry {
                country: normalize_country(country),
                zone: feature.zone_name().map(str::to_string),
                geometry,
            });
        }

        Self { entries }
    }

    /// Number of usable features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching<'a>(&'a self, country: &str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        let country = normalize_country(country);
        self.entries.iter().filter(move |e| e.country == country)
    }

    /// The whole-country region: the first feature matching `country`.
    pub fn country(&self, country: &str) -> CatalogResult<Region> {
        let entry = self
            .matching(country)
            .next()
            .ok_or_else(|| CatalogError::CountryNotFound(normalize_country(country)))?;

        Ok(Region {
            country: entry.country.clone(),
            zone: None,
            geometry: entry.geometry.clone(),
        })
    }

    /// One region per distinct zone of `country`, in first-appearance order.
    ///
    /// A zone listed by several features uses the first feature's geometry.
    /// Features with no `zoneName` are skipped.
    pub fn zones(&self, country: &str) -> CatalogResult<Vec<Region>> {
        let mut regions: Vec<Region> = Vec::new();
        let mut found = false;

        for entry in self.matching(country) {
            found = true;
            let Some(zone) = &entry.zone else {
                warn!(country = %entry.country, "No zone name for feature, skipping");
                continue;
            };
            if regions.iter().any(|r| r.zone.as_deref() == Some(zone.as_str())) {
                continue;
            }
            regions.push(Region {
                country: entry.country.clone(),
                zone: Some(zone.clone()),
                geometry: entry.geometry.clone(),
            });
        }

        if !found {
            return Err(CatalogError::CountryNotFound(normalize_country(country)));
        }
        Ok(regions)
    }

    /// Distinct countries, sorted by name, with their zone counts.
    pub fn countries(&self) -> Vec<CountrySummary> {
        let mut zones: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for entry in &self.entries {
            let set = zones.entry(entry.country.as_str()).or_default();
            if let Some(zone) = &entry.zone {
                set.insert(zone.as_str());
            }
        }

        zones
            .into_iter()
            .map(|(name, set)| CountrySummary {
                name: name.to_string(),
                zones: set.len(),
            })
            .collect()
    }
}
