//! Region catalog: country and zone polygons from a GeoJSON region file.
//!
//! The region file is a GeoJSON `FeatureCollection` whose features carry a
//! `countryName` and, for power-market style subdivisions, a `zoneName`
//! property. Lookups are case-insensitive on the country name.

pub mod catalog;
pub mod error;
pub mod geojson;

pub use catalog::{CountrySummary, Region, RegionCatalog};
pub use error::{CatalogError, CatalogResult};
pub use geojson::{RegionFeature, RegionFeatureCollection, RegionGeometry, RegionProperties};
