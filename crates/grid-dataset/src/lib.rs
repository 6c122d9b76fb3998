//! Gridded climate datasets.
//!
//! A dataset is a single variable on a regular latitude/longitude grid with
//! a time axis, stored on disk as `{variable}_{method}.nc`. This crate
//! provides:
//!
//! - [`GriddedDataset`]: the in-memory (time, lat, lon) cube
//! - [`DatasetLoader`]: path resolution and existence checks for a data directory
//! - [`DatasetReader`]: the file-format seam; NetCDF support lives behind the
//!   `netcdf` cargo feature
//! - CF time axis decoding

pub mod cf_time;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod reader;

#[cfg(feature = "netcdf")]
pub mod native;

pub use cf_time::CfTimeUnits;
pub use dataset::{DatasetDims, GriddedDataset};
pub use error::{DatasetError, DatasetResult};
pub use loader::{DatasetKey, DatasetLoader};
pub use reader::{default_reader, DatasetReader, InMemoryReader, UnsupportedReader};

#[cfg(feature = "netcdf")]
pub use native::NetcdfReader;
