//! GeoJSON types for the region file.
//!
//! Only the parts of GeoJSON that describe areal regions are modelled:
//! `Polygon` and `MultiPolygon` geometries. Other geometry types parse as
//! [`RegionGeometry::Unsupported`] and are ignored by the catalog.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection of regions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<RegionFeature>,
}

/// A single region feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Region geometry. GeoJSON allows `null`.
    #[serde(default)]
    pub geometry: Option<RegionGeometry>,

    /// Region attributes. GeoJSON allows `null`.
    #[serde(default)]
    pub properties: Option<RegionProperties>,
}

impl RegionFeature {
    pub fn country_name(&self) -> Option<&str> {
        self.properties.as_ref()?.country_name.as_deref()
    }

    pub fn zone_name(&self) -> Option<&str> {
        self.properties.as_ref()?.zone_name.as_deref()
    }
}

/// Attributes the catalog reads from each feature. Other properties are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegionProperties {
    #[serde(rename = "countryName", default)]
    pub country_name: Option<String>,

    #[serde(rename = "zoneName", default)]
    pub zone_name: Option<String>,
}

/// Areal GeoJSON geometries.
///
/// Positions are kept as plain number arrays so that 3D positions
/// (`[lon, lat, z]`) are accepted; only the first two ordinates are used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RegionGeometry {
    /// A polygon: exterior ring followed by holes.
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },

    /// A set of polygons.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },

    /// Points, lines and collections carry no area.
    #[serde(other)]
    Unsupported,
}

impl RegionGeometry {
    /// Convert to a `geo` multipolygon. `None` for unsupported geometries.
    pub fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        match self {
            RegionGeometry::Polygon { coordinates } => {
                Some(MultiPolygon::new(vec![rings_to_polygon(coordinates)?]))
            }
            RegionGeometry::MultiPolygon { coordinates } => {
                let polygons: Vec<Polygon<f64>> = coordinates
                    .iter()
                    .filter_map(|rings| rings_to_polygon(rings))
                    .collect();
                if polygons.is_empty() {
                    None
                } else {
                    Some(MultiPolygon::new(polygons))
                }
            }
            RegionGeometry::Unsupported => None,
        }
    }
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| ring_to_line_string(ring));
    let exterior = rings.next()?;
    if exterior.0.len() < 3 {
        return None;
    }
    Some(Polygon::new(exterior, rings.collect()))
}

fn ring_to_line_string(ring: &[Vec<f64>]) -> LineString<f64> {
    ring.iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coord {
            x: position[0],
            y: position[1],
        })
        .collect()
}
