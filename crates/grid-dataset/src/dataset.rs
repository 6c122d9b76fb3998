//! The in-memory (time, lat, lon) cube.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{DatasetError, DatasetResult};

/// One variable on a lat/lon grid over time.
///
/// Values are stored time-major: index `t * (nlat * nlon) + i * nlon + j`
/// holds the value at `time[t]`, `lat[i]`, `lon[j]`. `NaN` marks a missing
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedDataset {
    variable: String,
    lat: Vec<f64>,
    lon: Vec<f64>,
    time: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl GriddedDataset {
    /// Build a dataset, checking that `values` covers the full cube.
    pub fn new(
        variable: impl Into<String>,
        lat: Vec<f64>,
        lon: Vec<f64>,
        time: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> DatasetResult<Self> {
        let expected = lat.len() * lon.len() * time.len();
        if values.len() != expected {
            return Err(DatasetError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            variable: variable.into(),
            lat,
            lon,
            time,
            values,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of cells in one time step.
    pub fn grid_len(&self) -> usize {
        self.lat.len() * self.lon.len()
    }

    /// Values of time step `t` in (lat, lon) row-major order.
    pub fn time_step(&self, t: usize) -> &[f64] {
        let n = self.grid_len();
        &self.values[t * n..(t + 1) * n]
    }

    /// Iterator over the time steps as grid slices.
    pub fn time_steps(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.time.len()).map(move |t| self.time_step(t))
    }

    pub fn dims(&self) -> DatasetDims {
        DatasetDims {
            time: self.time.len(),
            lat: self.lat.len(),
            lon: self.lon.len(),
        }
    }
}

/// Dimension sizes of a dataset, logged after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetDims {
    pub time: usize,
    pub lat: usize,
    pub lon: usize,
}

impl fmt::Display for DatasetDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{time: {}, lat: {}, lon: {}}}", self.time, self.lat, self.lon)
    }
}
