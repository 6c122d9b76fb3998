//! Region extraction pipeline.
//!
//! Turns a gridded dataset and a region polygon into a daily area-mean
//! series with extreme-percentile flags, written as CSV (one region) or a
//! ZIP of CSVs (one per zone).
//!
//! The stages are usable on their own:
//!
//! - [`mask`]: polygon rasterization onto the dataset grid
//! - [`aggregate`]: area mean, percentiles and exceedance flags
//! - [`table`]: the output table and its CSV encoding
//! - [`archive`]: bundling zone CSVs
//! - [`pipeline`]: the whole-country and subregion drivers

pub mod aggregate;
pub mod archive;
pub mod error;
pub mod mask;
pub mod pipeline;
pub mod table;

pub use aggregate::{DailySeries, Exceedance, PercentileColumn, PERCENTILES};
pub use error::{ExtractionError, ExtractionResult};
pub use mask::RegionMask;
pub use pipeline::{extract_data, ExtractionOutput, Extractor};
pub use table::ExtremeTable;
