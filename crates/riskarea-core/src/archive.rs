// crates/riskarea-core/src/archive.rs

//! # Archive Expander
//!
//! Turns a downloaded upload into the list of member files to parse.
//! Containers are opened into a scratch directory; anything else is its own
//! single member and is returned untouched.

use crate::error::{IngestError, Result};
use crate::format::ContainerKind;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Fresh per-invocation scratch directory under `parent`; removed on drop.
pub fn scratch_dir(parent: &Path) -> Result<TempDir> {
    fs::create_dir_all(parent)?;
    Ok(tempfile::Builder::new()
        .prefix("riskarea-")
        .tempdir_in(parent)?)
}

/// Expands `path` into member files.
///
/// Zip members come back in archive listing order (directories are
/// skipped). A non-container yields `vec![path]` without copying.
pub fn expand(path: &Path, scratch: &Path) -> Result<Vec<PathBuf>> {
    match ContainerKind::from_path(path) {
        Some(ContainerKind::Zip) => extract_zip(path, scratch),
        Some(ContainerKind::Gzip) => extract_gzip(path, scratch),
        None => Ok(vec![path.to_path_buf()]),
    }
}

fn extract_zip(path: &Path, scratch: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(path).map_err(|e| IngestError::extraction(path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| IngestError::extraction(path, e))?;

    let mut members = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| IngestError::extraction(path, e))?;
        if entry.is_dir() {
            continue;
        }

        // enclosed_name() refuses absolute paths and `..` traversal.
        let relative = entry.enclosed_name().ok_or_else(|| {
            IngestError::extraction(path, format!("entry '{}' escapes the archive", entry.name()))
        })?;
        let target = scratch.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| IngestError::extraction(path, e))?;
        }

        let mut out = File::create(&target).map_err(|e| IngestError::extraction(path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| IngestError::extraction(path, e))?;
        members.push(target);
    }

    tracing::debug!(archive = %path.display(), members = members.len(), "zip archive expanded");
    Ok(members)
}

#[cfg(feature = "compact")]
fn extract_gzip(path: &Path, scratch: &Path) -> Result<Vec<PathBuf>> {
    use flate2::read::GzDecoder;

    // `area.geojson.gz` -> `area.geojson`
    let inner_name = path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .ok_or_else(|| IngestError::extraction(path, "gzip upload has no file name"))?;
    let target = scratch.join(inner_name);

    let file = File::open(path).map_err(|e| IngestError::extraction(path, e))?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut out = File::create(&target).map_err(|e| IngestError::extraction(path, e))?;
    io::copy(&mut decoder, &mut out).map_err(|e| IngestError::extraction(path, e))?;

    Ok(vec![target])
}

#[cfg(not(feature = "compact"))]
fn extract_gzip(path: &Path, _scratch: &Path) -> Result<Vec<PathBuf>> {
    Err(IngestError::extraction(
        path,
        format!(
            "'.{}' uploads need the 'compact' feature",
            crate::format::extension_of(path)
        ),
    ))
}
