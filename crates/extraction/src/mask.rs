//! Region masks on a lat/lon grid.
//!
//! A mask assigns every grid cell the index of the first polygon whose
//! interior contains the cell centre, or `None` when no polygon does. Only
//! cells coded `0` (inside the first polygon) are selected when the mask is
//! applied.

use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use rayon::prelude::*;

/// Integer-coded region membership for each cell of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    nlat: usize,
    nlon: usize,
    codes: Vec<Option<usize>>,
}

struct PreparedRegion<'a> {
    geometry: &'a MultiPolygon<f64>,
    // None for an empty geometry, which contains nothing
    bounds: Option<Rect<f64>>,
}

impl RegionMask {
    /// Rasterize `regions` onto the grid defined by `lat` and `lon` cell centres.
    ///
    /// Longitudes in `[0, 360)` are wrapped to `[-180, 180)` when every region
    /// lies within `[-180, 180]`.
    pub fn rasterize(regions: &[&MultiPolygon<f64>], lat: &[f64], lon: &[f64]) -> Self {
        let prepared: Vec<PreparedRegion> = regions
            .iter()
            .map(|&geometry| PreparedRegion {
                geometry,
                bounds: geometry.bounding_rect(),
            })
            .collect();

        let wrap = prepared
            .iter()
            .filter_map(|r| r.bounds)
            .all(|b| b.max().x <= 180.0);
        let lon: Vec<f64> = lon
            .iter()
            .map(|&x| if wrap && x >= 180.0 { x - 360.0 } else { x })
            .collect();

        let nlat = lat.len();
        let nlon = lon.len();
        let mut codes = vec![None; nlat * nlon];

        if nlon > 0 {
            codes
                .par_chunks_mut(nlon)
                .zip(lat.par_iter())
                .for_each(|(row, &y)| {
                    for (cell, &x) in row.iter_mut().zip(lon.iter()) {
                        *cell = first_containing(&prepared, x, y);
                    }
                });
        }

        Self { nlat, nlon, codes }
    }

    /// Mask for a single region.
    pub fn for_region(geometry: &MultiPolygon<f64>, lat: &[f64], lon: &[f64]) -> Self {
        Self::rasterize(&[geometry], lat, lon)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nlat, self.nlon)
    }

    /// Region code of the cell at (`lat_index`, `lon_index`).
    pub fn code(&self, lat_index: usize, lon_index: usize) -> Option<usize> {
        self.codes[lat_index * self.nlon + lon_index]
    }

    /// Whether the cell at flat index `index` is inside the first region.
    pub fn selects(&self, index: usize) -> bool {
        self.codes[index] == Some(0)
    }

    pub fn selected_count(&self) -> usize {
        self.codes.iter().filter(|c| **c == Some(0)).count()
    }

    /// Values of the selected cells in one time step of a dataset.
    ///
    /// `step` is laid out like [`grid_dataset::GriddedDataset::time_step`].
    pub fn selected_values<'a>(&'a self, step: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        debug_assert_eq!(step.len(), self.codes.len());
        step.iter()
            .zip(self.codes.iter())
            .filter(|(_, code)| **code == Some(0))
            .map(|(&v, _)| v)
    }
}

fn first_containing(regions: &[PreparedRegion], x: f64, y: f64) -> Option<usize> {
    let point = Point::new(x, y);
    regions.iter().position(|r| match r.bounds {
        Some(b) => {
            x >= b.min().x
                && x <= b.max().x
                && y >= b.min().y
                && y <= b.max().y
                && r.geometry.contains(&point)
        }
        None => false,
    })
}
