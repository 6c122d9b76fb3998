//! Test data generators for synthetic climate grids.
//!
//! These generators create predictable, verifiable values so expected area
//! means can be worked out by hand.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use grid_dataset::GriddedDataset;

/// Midnight timestamps for `days` consecutive days starting at `start`.
pub fn daily_times(start: NaiveDate, days: usize) -> Vec<NaiveDateTime> {
    let midnight = start.and_hms_opt(0, 0, 0).expect("valid midnight");
    (0..days)
        .map(|d| midnight + Duration::days(d as i64))
        .collect()
}

/// Centres of `n` cells of width `step` starting at edge `start`.
///
/// ```
/// use test_utils::cell_centres;
///
/// assert_eq!(cell_centres(10.0, 3, 1.0), vec![10.5, 11.5, 12.5]);
/// ```
pub fn cell_centres(start: f64, n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|k| start + step * (k as f64 + 0.5)).collect()
}

/// Build a dataset whose value at (time index, lat, lon) is `f(t, lat, lon)`.
pub fn dataset_from_fn(
    variable: &str,
    lat: Vec<f64>,
    lon: Vec<f64>,
    time: Vec<NaiveDateTime>,
    f: impl Fn(usize, f64, f64) -> f64,
) -> GriddedDataset {
    let mut values = Vec::with_capacity(lat.len() * lon.len() * time.len());
    for t in 0..time.len() {
        for &y in &lat {
            for &x in &lon {
                values.push(f(t, y, x));
            }
        }
    }
    GriddedDataset::new(variable, lat, lon, time, values).expect("consistent synthetic shape")
}

/// A dataset holding `value` everywhere.
pub fn constant_dataset(
    variable: &str,
    lat: Vec<f64>,
    lon: Vec<f64>,
    time: Vec<NaiveDateTime>,
    value: f64,
) -> GriddedDataset {
    dataset_from_fn(variable, lat, lon, time, |_, _, _| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_times() {
        let times = daily_times(NaiveDate::from_ymd_opt(2020, 2, 28).unwrap(), 3);
        assert_eq!(times[2].date(), NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
    }

    #[test]
    fn test_dataset_from_fn_layout() {
        let ds = dataset_from_fn(
            "v",
            vec![1.0, 2.0],
            vec![10.0, 20.0, 30.0],
            daily_times(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 2),
            |t, lat, lon| t as f64 * 1000.0 + lat * 100.0 + lon,
        );
        assert_eq!(ds.time_step(0), &[110.0, 120.0, 130.0, 210.0, 220.0, 230.0]);
        assert_eq!(ds.time_step(1)[0], 1110.0);
    }
}
