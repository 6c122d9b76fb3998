//! The shared output directory.
//!
//! One directory holds every generated artifact. It is wiped and recreated
//! at the start of each extraction and on `/cleanup`, so concurrent
//! requests can remove each other's files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cleanup::CleanupRegistry;

#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if it does not exist.
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.path)
    }

    /// Delete the directory with all contents, recreate it empty, and cancel
    /// every pending deletion.
    pub fn reset(&self, cleanup: &CleanupRegistry) -> io::Result<()> {
        cleanup.cancel_all();

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Deleted download directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        std::fs::create_dir_all(&self.path)?;
        info!(path = %self.path.display(), "Recreated download directory");
        Ok(())
    }

    /// Path of a served file, or `None` for names that could escape the directory.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        if is_safe_file_name(file_name) {
            Some(self.path.join(file_name))
        } else {
            None
        }
    }
}

/// Accepts a single file name directly inside the directory: no `..` and
/// no path separators (axum decodes `%2F` before the handler sees it).
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(&['/', '\\'][..])
}
