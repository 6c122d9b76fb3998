//! ZIP bundling of zone CSVs.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExtractionResult;

/// Write `files` into a deflate-compressed archive at `archive_path`.
///
/// Entries are named by base file name only.
pub fn write_archive(archive_path: &Path, files: &[PathBuf]) -> ExtractionResult<()> {
    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("no file name in {}", path.display()),
                )
            })?;
        zip.start_file(name, options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut zip)?;
        debug!(entry = name, "Added archive entry");
    }

    zip.finish()?;
    Ok(())
}
