//! Result archive extraction.

use std::fs;
use std::io;
use std::path::Path;

use crate::convert::error::{ConvertError, Result};

/// Unpacks every entry of a zip-format archive into `dest_dir`, creating
/// intermediate directories as required.
///
/// Any entry whose resolved path escapes `dest_dir` (a zip-slip entry)
/// aborts the whole extraction before a single byte is written outside the
/// destination.
///
/// Decompression is blocking work, so it runs on the blocking thread pool.
pub async fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    tokio::task::spawn_blocking(move || extract_blocking(&archive_path, &dest_dir))
        .await
        .map_err(|e| ConvertError::Unexpected(format!("extraction task panicked: {}", e)))?
}

fn extract_blocking(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path).map_err(|e| {
        ConvertError::Extraction(format!(
            "failed to open {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        ConvertError::Extraction(format!("invalid or corrupt archive: {}", e))
    })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            ConvertError::Extraction(format!("failed to read entry {}: {}", index, e))
        })?;

        // Zip-slip guard: the sanitized name is None for entries that would
        // resolve outside the destination (e.g. "../../evil").
        let relative = entry.enclosed_name().ok_or_else(|| {
            ConvertError::Extraction(format!(
                "entry {:?} escapes the destination directory",
                entry.name()
            ))
        })?;
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| {
                ConvertError::Extraction(format!(
                    "failed to create {}: {}",
                    out_path.display(),
                    e
                ))
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConvertError::Extraction(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let mut out_file = fs::File::create(&out_path).map_err(|e| {
            ConvertError::Extraction(format!("failed to create {}: {}", out_path.display(), e))
        })?;
        io::copy(&mut entry, &mut out_file).map_err(|e| {
            ConvertError::Extraction(format!("failed to write {}: {}", out_path.display(), e))
        })?;
    }

    Ok(())
}
