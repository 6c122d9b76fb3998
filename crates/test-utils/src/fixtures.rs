//! Common test fixtures: region files and a matching synthetic grid.
//!
//! The "nordic" fixtures pair a small GeoJSON region file with a 1 degree
//! grid covering 4..20 E, 55..70 N. Region rectangles sit on whole degrees
//! so cell centres never fall on a boundary.

use chrono::NaiveDate;
use grid_dataset::GriddedDataset;
use serde_json::{json, Value};

use crate::generators::{cell_centres, daily_times, dataset_from_fn};

/// Default region file name.
pub const REGION_FILE_NAME: &str = "world_power_region.geojson";

/// First day of the nordic fixture series.
pub fn nordic_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")
}

/// A rectangular polygon feature. `bounds` is `[min_lon, min_lat, max_lon, max_lat]`.
pub fn rect_feature(country: &str, zone: Option<&str>, bounds: [f64; 4]) -> Value {
    let [x0, y0, x1, y1] = bounds;
    let mut properties = json!({ "countryName": country });
    if let Some(zone) = zone {
        properties["zoneName"] = json!(zone);
    }
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
        }
    })
}

/// Serialize features as a FeatureCollection.
pub fn feature_collection(features: Vec<Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Region file for the nordic grid.
///
/// | feature | country | zone | bounds |
/// |---|---|---|---|
/// | 0 | Norway | NO1 | 9..12 E, 59..61 N (6 cells) |
/// | 1 | Norway | NO2 | 5..9 E, 58..61 N (12 cells) |
/// | 2 | Norway | NO1 | 13..14 E, 65..66 N (duplicate zone, ignored) |
/// | 3 | Norway | NO5 | 30..31 E, 75..76 N (off the grid) |
/// | 4 | Norway | (none) | 5..8 E, 62..64 N |
/// | 5 | Sweden | SE3 | 12..17 E, 57..61 N |
/// | 6 | Atlantis | (none) | null geometry |
pub fn nordic_regions_geojson() -> String {
    let mut features = vec![
        rect_feature("Norway", Some("NO1"), [9.0, 59.0, 12.0, 61.0]),
        rect_feature("Norway", Some("NO2"), [5.0, 58.0, 9.0, 61.0]),
        rect_feature("Norway", Some("NO1"), [13.0, 65.0, 14.0, 66.0]),
        rect_feature("Norway", Some("NO5"), [30.0, 75.0, 31.0, 76.0]),
        rect_feature("Norway", None, [5.0, 62.0, 8.0, 64.0]),
        rect_feature("Sweden", Some("SE3"), [12.0, 57.0, 17.0, 61.0]),
    ];
    features.push(json!({
        "type": "Feature",
        "properties": { "countryName": "Atlantis" },
        "geometry": null
    }));
    feature_collection(features)
}

/// Latitude centres of the nordic grid (55.5 ..= 69.5).
pub fn nordic_lat() -> Vec<f64> {
    cell_centres(55.0, 15, 1.0)
}

/// Longitude centres of the nordic grid (4.5 ..= 19.5).
pub fn nordic_lon() -> Vec<f64> {
    cell_centres(4.0, 16, 1.0)
}

/// Nordic dataset with value `lon + lat / 100 + t` on day `t`.
///
/// The area mean of an axis-aligned rectangle is therefore
/// `mean(lon) + mean(lat) / 100 + t`: NO1 gives `11.1 + t`, NO2 `7.595 + t`.
pub fn nordic_dataset(variable: &str, days: usize) -> GriddedDataset {
    dataset_from_fn(
        variable,
        nordic_lat(),
        nordic_lon(),
        daily_times(nordic_start(), days),
        |t, lat, lon| lon + lat / 100.0 + t as f64,
    )
}
