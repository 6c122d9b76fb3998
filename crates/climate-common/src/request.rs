//! Extraction request model and output naming rules.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// File extension of gridded datasets on disk.
pub const DATASET_EXTENSION: &str = "nc";

/// Spatial granularity of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMode {
    /// One series for the whole country (first matching polygon).
    Country,
    /// One series per zone of the country, bundled in an archive.
    Subregion,
}

impl AreaMode {
    /// `"subregion"` selects subregion mode; any other value is whole-country.
    pub fn from_area(area: &str) -> Self {
        if area == "subregion" {
            AreaMode::Subregion
        } else {
            AreaMode::Country
        }
    }

    pub fn is_subregion(&self) -> bool {
        matches!(self, AreaMode::Subregion)
    }
}

/// Lower-case a country name for catalog comparison and file naming.
pub fn normalize_country(name: &str) -> String {
    name.to_lowercase()
}

/// A validated extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Lower-cased country name.
    pub country: String,
    pub variable: String,
    pub method: String,
    pub area: AreaMode,
}

impl ExtractionRequest {
    pub fn new(
        country: impl AsRef<str>,
        variable: impl Into<String>,
        method: impl Into<String>,
        area: AreaMode,
    ) -> Self {
        Self {
            country: normalize_country(country.as_ref()),
            variable: variable.into(),
            method: method.into(),
            area,
        }
    }

    /// Build a request from raw optional fields.
    ///
    /// Absent and empty fields are both rejected.
    pub fn from_fields(
        country: Option<&str>,
        variable: Option<&str>,
        method: Option<&str>,
        area: Option<&str>,
    ) -> Result<Self, RequestError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }
        match (
            present(country),
            present(variable),
            present(method),
            present(area),
        ) {
            (Some(c), Some(v), Some(m), Some(a)) => Ok(Self::new(c, v, m, AreaMode::from_area(a))),
            _ => Err(RequestError::MissingField),
        }
    }

    /// Stem shared by the whole-country CSV and the subregion archive.
    pub fn artifact_stem(&self) -> String {
        format!("{}_{}_{}", self.country, self.variable, self.method)
    }

    /// `{country}_{variable}_{method}.csv`
    pub fn country_csv_name(&self) -> String {
        format!("{}.csv", self.artifact_stem())
    }

    /// `{country}_{variable}_{method}.zip`
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.artifact_stem())
    }

    /// `{country}_{zone}_{variable}_{method}.csv`
    pub fn zone_csv_name(&self, zone: &str) -> String {
        format!(
            "{}_{}_{}_{}.csv",
            self.country, zone, self.variable, self.method
        )
    }

    /// Header of the raw daily-value column.
    pub fn raw_column_name(&self, zone: Option<&str>) -> String {
        match zone {
            Some(zone) => format!("{}_{}_{}", self.country, zone, self.variable),
            None => format!("{}_{}", self.country, self.variable),
        }
    }
}
