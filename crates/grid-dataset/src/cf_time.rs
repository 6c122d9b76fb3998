//! CF-convention time axis decoding.
//!
//! Time coordinates are stored as offsets from an epoch, described by a
//! `units` attribute such as `"days since 1979-01-01"` or
//! `"hours since 1900-01-01 00:00:00"`.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{DatasetError, DatasetResult};

/// Parsed `"<unit> since <epoch>"` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    unit_millis: i64,
    epoch: NaiveDateTime,
}

impl CfTimeUnits {
    /// Parse a CF `units` string.
    pub fn parse(units: &str) -> DatasetResult<Self> {
        let lower = units.trim().to_ascii_lowercase();
        let (unit, epoch) = lower
            .split_once(" since ")
            .ok_or_else(|| DatasetError::InvalidTime(format!("unrecognised units '{units}'")))?;

        let unit_millis = match unit.trim() {
            "days" | "day" | "d" => 86_400_000,
            "hours" | "hour" | "hr" | "h" => 3_600_000,
            "minutes" | "minute" | "min" => 60_000,
            "seconds" | "second" | "sec" | "s" => 1_000,
            other => {
                return Err(DatasetError::InvalidTime(format!(
                    "unsupported time unit '{other}'"
                )))
            }
        };

        Ok(Self {
            unit_millis,
            epoch: parse_epoch(epoch.trim())?,
        })
    }

    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// Convert an offset in these units to a timestamp.
    pub fn decode(&self, offset: f64) -> DatasetResult<NaiveDateTime> {
        if !offset.is_finite() {
            return Err(DatasetError::InvalidTime(format!(
                "non-finite time value {offset}"
            )));
        }
        let millis = (offset * self.unit_millis as f64).round() as i64;
        self.epoch
            .checked_add_signed(Duration::milliseconds(millis))
            .ok_or_else(|| DatasetError::InvalidTime(format!("time value {offset} out of range")))
    }

    pub fn decode_all(&self, offsets: &[f64]) -> DatasetResult<Vec<NaiveDateTime>> {
        offsets.iter().map(|&v| self.decode(v)).collect()
    }
}

fn parse_epoch(text: &str) -> DatasetResult<NaiveDateTime> {
    let text = text
        .trim_end_matches(" utc")
        .trim_end_matches('z')
        .replace('t', " ");
    // Drop a trailing numeric zone offset such as "+00:00"
    let text = match text.rfind('+') {
        Some(idx) if idx > 10 => text[..idx].trim().to_string(),
        _ => text,
    };

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&text, format) {
            return Ok(ts);
        }
    }
    // Date-only epochs, possibly with an hour but no minutes ("1900-1-1 0")
    let date_part = text.split_whitespace().next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DatasetError::InvalidTime(format!("unparseable epoch '{text}'")))
}
