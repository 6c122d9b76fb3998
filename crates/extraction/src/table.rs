//! The per-region output table and its CSV encoding.
//!
//! Layout:
//!
//! ```text
//! Time,<raw>,1th_percentile,1th_percentile_mask,...,99th_percentile,99th_percentile_mask
//! 2020-01-01,11.1,11.19,0,...
//! ```
//!
//! Thresholds repeat on every row. Missing raw values are written as empty
//! fields. Timestamps are written as dates when every timestamp falls on
//! midnight.

use std::io::Write;
use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};

use crate::aggregate::{DailySeries, PercentileColumn};
use crate::error::ExtractionResult;

/// Name of the index column.
pub const TIME_COLUMN: &str = "Time";

/// Daily series plus percentile columns for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeTable {
    pub raw_column: String,
    pub series: DailySeries,
    pub percentiles: Vec<PercentileColumn>,
}

impl ExtremeTable {
    /// Compute the percentile columns for `series`.
    pub fn build(raw_column: impl Into<String>, series: DailySeries) -> Self {
        let percentiles = series.percentile_columns();
        Self {
            raw_column: raw_column.into(),
            series,
            percentiles,
        }
    }

    /// Header row, index column first.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(2 + 2 * self.percentiles.len());
        columns.push(TIME_COLUMN.to_string());
        columns.push(self.raw_column.clone());
        for p in &self.percentiles {
            columns.push(p.threshold_name());
            columns.push(p.mask_name());
        }
        columns
    }

    pub fn row_count(&self) -> usize {
        self.series.len()
    }

    /// Write the table as CSV to `path`, replacing any existing file.
    pub fn write_csv(&self, path: &Path) -> ExtractionResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    /// Write the table as CSV to any writer.
    pub fn write_to<W: Write>(&self, writer: W) -> ExtractionResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.columns())?;

        let date_only = self.series.time.iter().all(|t| t.time() == NaiveTime::MIN);
        let thresholds: Vec<String> = self
            .percentiles
            .iter()
            .map(|p| format_float(p.threshold))
            .collect();

        for (row, (time, value)) in self
            .series
            .time
            .iter()
            .zip(self.series.values.iter())
            .enumerate()
        {
            let mut record = Vec::with_capacity(2 + 2 * self.percentiles.len());
            record.push(format_time(time, date_only));
            record.push(format_float(*value));
            for (p, threshold) in self.percentiles.iter().zip(thresholds.iter()) {
                record.push(threshold.clone());
                record.push(p.mask[row].to_string());
            }
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn format_time(time: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        time.format("%Y-%m-%d").to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Shortest round-trip representation; whole numbers keep `.0`, missing is
/// empty. Exponents carry a sign and at least two digits (`1e-07`, `1e+16`).
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}
