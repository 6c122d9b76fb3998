//! NetCDF backend using the native netcdf library.
//!
//! The data variable must have a time dimension and two spatial dimensions
//! whose coordinate variables are `lat`/`lon` or `latitude`/`longitude`.
//! Dimension order in the file is free; values are reordered to
//! (time, lat, lon) on read.

use std::path::Path;

use tracing::debug;

use crate::cf_time::CfTimeUnits;
use crate::dataset::GriddedDataset;
use crate::error::{DatasetError, DatasetResult};
use crate::reader::DatasetReader;

const LAT_NAMES: &[&str] = &["lat", "latitude"];
const LON_NAMES: &[&str] = &["lon", "longitude"];
const TIME_NAMES: &[&str] = &["time"];

/// Reads datasets with libnetcdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetcdfReader;

impl NetcdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetReader for NetcdfReader {
    fn read(&self, path: &Path, variable: &str) -> DatasetResult<GriddedDataset> {
        let file = netcdf::open(path)?;

        let var = file
            .variable(variable)
            .ok_or_else(|| DatasetError::VariableNotFound {
                variable: variable.to_string(),
                path: path.to_path_buf(),
            })?;

        let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let dim_lens: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if dim_names.len() != 3 {
            return Err(DatasetError::Read(format!(
                "variable '{variable}' has {} dimensions, expected time, lat and lon",
                dim_names.len()
            )));
        }

        let t_axis = find_axis(&dim_names, TIME_NAMES, "time")?;
        let lat_axis = find_axis(&dim_names, LAT_NAMES, "lat")?;
        let lon_axis = find_axis(&dim_names, LON_NAMES, "lon")?;

        let lat = read_coordinate(&file, &dim_names[lat_axis])?;
        let lon = read_coordinate(&file, &dim_names[lon_axis])?;
        let time = read_time(&file, &dim_names[t_axis])?;

        let raw: Vec<f64> = var.get_values(..)?;
        let unpacked = unpack(&var, raw);

        let values = reorder(&unpacked, &dim_lens, [t_axis, lat_axis, lon_axis]);
        debug!(
            variable,
            dims = ?dim_names,
            "Read NetCDF variable"
        );

        GriddedDataset::new(variable, lat, lon, time, values)
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn find_axis(names: &[String], candidates: &[&str], label: &str) -> DatasetResult<usize> {
    names
        .iter()
        .position(|n| candidates.contains(&n.to_ascii_lowercase().as_str()))
        .ok_or_else(|| DatasetError::MissingCoordinate(label.to_string()))
}

fn read_coordinate(file: &netcdf::File, name: &str) -> DatasetResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| DatasetError::MissingCoordinate(name.to_string()))?;
    Ok(var.get_values(..)?)
}

fn read_time(file: &netcdf::File, name: &str) -> DatasetResult<Vec<chrono::NaiveDateTime>> {
    let var = file
        .variable(name)
        .ok_or_else(|| DatasetError::MissingCoordinate(name.to_string()))?;
    let units = get_string_attr(&var, "units")
        .ok_or_else(|| DatasetError::InvalidTime(format!("'{name}' has no units attribute")))?;
    let offsets: Vec<f64> = var.get_values(..)?;
    CfTimeUnits::parse(&units)?.decode_all(&offsets)
}

/// Apply `_FillValue`/`missing_value` masking, then `scale_factor`/`add_offset`.
fn unpack(var: &netcdf::Variable, raw: Vec<f64>) -> Vec<f64> {
    let scale = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill = get_f64_attr(var, "_FillValue");
    let missing = get_f64_attr(var, "missing_value");

    raw.into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing || v.is_nan() {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect()
}

/// Reorder a C-order array with dimension lengths `lens` so that the axes
/// listed in `order` become (slowest, middle, fastest).
fn reorder(values: &[f64], lens: &[usize], order: [usize; 3]) -> Vec<f64> {
    if order == [0, 1, 2] {
        return values.to_vec();
    }

    let strides = [lens[1] * lens[2], lens[2], 1];
    let [a, b, c] = order;
    let mut out = Vec::with_capacity(values.len());
    for i in 0..lens[a] {
        for j in 0..lens[b] {
            for k in 0..lens[c] {
                out.push(values[i * strides[a] + j * strides[b] + k * strides[c]]);
            }
        }
    }
    out
}

/// Check if a variable has an attribute with the given name.
/// Avoids HDF5 error spam when probing optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    String::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_identity() {
        let values: Vec<f64> = (0..6).map(f64::from).collect();
        assert_eq!(reorder(&values, &[1, 2, 3], [0, 1, 2]), values);
    }

    #[test]
    fn test_reorder_time_last() {
        // File layout (lat=2, lon=1, time=3)
        let values: Vec<f64> = (0..6).map(f64::from).collect();
        let out = reorder(&values, &[2, 1, 3], [2, 0, 1]);
        // (time, lat, lon): t0 -> [0, 3], t1 -> [1, 4], t2 -> [2, 5]
        assert_eq!(out, vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_find_axis_accepts_long_names() {
        let names = vec!["time".to_string(), "latitude".to_string(), "longitude".to_string()];
        assert_eq!(find_axis(&names, LAT_NAMES, "lat").unwrap(), 1);
        assert_eq!(find_axis(&names, LON_NAMES, "lon").unwrap(), 2);
        assert!(find_axis(&names, &["depth"], "depth").is_err());
    }
}
