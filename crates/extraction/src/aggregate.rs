//! Area-mean reduction and extreme percentiles.

use chrono::NaiveDateTime;
use grid_dataset::GriddedDataset;

use crate::mask::RegionMask;

/// Percentiles reported for every series, in column order.
pub const PERCENTILES: [u8; 10] = [1, 2, 3, 4, 5, 95, 96, 97, 98, 99];

/// One area-mean value per time step. `NaN` marks a step with no valid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub time: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}

impl DailySeries {
    /// Mean of the non-missing cells selected by `mask`, per time step.
    pub fn area_mean(dataset: &GriddedDataset, mask: &RegionMask) -> Self {
        let values = dataset
            .time_steps()
            .map(|step| nan_mean(mask.selected_values(step)))
            .collect();

        Self {
            time: dataset.time().to_vec(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether at least one value is not missing.
    pub fn has_valid(&self) -> bool {
        self.values.iter().any(|v| !v.is_nan())
    }

    /// Threshold and exceedance flags for each of [`PERCENTILES`].
    pub fn percentile_columns(&self) -> Vec<PercentileColumn> {
        let mut sorted: Vec<f64> = self.values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        PERCENTILES
            .iter()
            .map(|&p| {
                let threshold = quantile_sorted(&sorted, f64::from(p) / 100.0);
                let direction = Exceedance::for_percentile(p);
                PercentileColumn {
                    percentile: p,
                    threshold,
                    mask: self
                        .values
                        .iter()
                        .map(|&v| u8::from(direction.exceeds(v, threshold)))
                        .collect(),
                }
            })
            .collect()
    }
}

/// Which side of a threshold counts as extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exceedance {
    /// Strictly below the threshold (low percentiles).
    Below,
    /// Strictly above the threshold (high percentiles).
    Above,
}

impl Exceedance {
    pub fn for_percentile(percentile: u8) -> Self {
        if percentile < 50 {
            Exceedance::Below
        } else {
            Exceedance::Above
        }
    }

    /// Comparisons with a missing value are false.
    pub fn exceeds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Exceedance::Below => value < threshold,
            Exceedance::Above => value > threshold,
        }
    }
}

/// Threshold and 0/1 exceedance flags for one percentile.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileColumn {
    pub percentile: u8,
    pub threshold: f64,
    pub mask: Vec<u8>,
}

impl PercentileColumn {
    /// `{p}th_percentile`
    pub fn threshold_name(&self) -> String {
        format!("{}th_percentile", self.percentile)
    }

    /// `{p}th_percentile_mask`
    pub fn mask_name(&self) -> String {
        format!("{}th_percentile_mask", self.percentile)
    }
}

/// Mean of the non-missing values, `NaN` when there are none.
fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Linear-interpolation quantile of ascending, non-missing `sorted` values.
///
/// Uses rank `h = (n - 1) * q` and interpolates between the neighbouring
/// order statistics. Returns `NaN` when no value is present.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * q.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = h - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
