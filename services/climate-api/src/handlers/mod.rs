//! HTTP request handlers for the extraction API.

pub mod api;
pub mod cleanup;
pub mod common;
pub mod download;
pub mod health;
pub mod landing;
pub mod process;
