// crates/riskarea-core/src/loader/mod.rs

//! # Geometry Loader
//!
//! Handles the Physical Layer (reading a member file) and delegates to the
//! format-specific parser picked by [`FileFormat`]. Every parser yields the
//! same [`FeatureCollection`] shape: geometry plus attribute columns.

use crate::error::{IngestError, Result};
use crate::feature::FeatureCollection;
use crate::format::FileFormat;
use std::fs;
use std::path::Path;

mod json;
mod markup;
mod shape;

/// Parses `path` as `format`.
///
/// Any failure is a [`IngestError::Parse`]; corrupt files are not told
/// apart from malformed ones.
pub fn load(path: &Path, format: FileFormat) -> Result<FeatureCollection> {
    let collection = match format {
        FileFormat::GeoJson => json::read(path)?,
        FileFormat::Kml => markup::read(path)?,
        FileFormat::Shapefile => shape::read(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        format = format.name(),
        features = collection.len(),
        "member loaded"
    );
    Ok(collection)
}

/// Reads a text-based geometry file.
fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| IngestError::parse(path, e))
}
