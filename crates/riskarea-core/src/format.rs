// crates/riskarea-core/src/format.rs

//! Extension-based classification of uploads and members.
//!
//! Extensions are compared case-insensitively.

use crate::error::{IngestError, Result};
use std::path::Path;

/// Geometry file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Boundary markup (`.kml`).
    Kml,
    GeoJson,
    /// The `.shp` component; `.dbf`/`.shx`/`.prj` sidecars are read through it.
    Shapefile,
}

/// Compressed containers the archive expander opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Zip,
    /// Single-file gzip stream (`area.geojson.gz`).
    Gzip,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_of(path).as_str() {
            "kml" => Some(Self::Kml),
            "geojson" => Some(Self::GeoJson),
            "shp" => Some(Self::Shapefile),
            _ => None,
        }
    }

    /// Like [`FileFormat::from_path`], but reports a miss as
    /// [`IngestError::UnsupportedFormat`].
    pub fn classify(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
            path: path.display().to_string(),
            extension: extension_of(path),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Kml => "KML",
            Self::GeoJson => "GeoJSON",
            Self::Shapefile => "ESRI Shapefile",
        }
    }
}

impl ContainerKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_of(path).as_str() {
            "zip" => Some(Self::Zip),
            "gz" => Some(Self::Gzip),
            _ => None,
        }
    }
}

/// Lower-cased extension without the dot; empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_formats_case_insensitive() {
        assert_eq!(FileFormat::from_path(Path::new("a/Area.KML")), Some(FileFormat::Kml));
        assert_eq!(
            FileFormat::from_path(Path::new("area.GeoJSON")),
            Some(FileFormat::GeoJson)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("limites.Shp")),
            Some(FileFormat::Shapefile)
        );
    }

    #[test]
    fn test_sidecars_and_text_are_unsupported() {
        for name in ["area.dbf", "area.shx", "area.prj", "leia-me.txt", "noext"] {
            let err = FileFormat::classify(Path::new(name)).unwrap_err();
            assert!(matches!(err, IngestError::UnsupportedFormat { .. }), "{name}");
        }
    }

    #[test]
    fn test_containers() {
        assert_eq!(ContainerKind::from_path(Path::new("up.ZIP")), Some(ContainerKind::Zip));
        assert_eq!(
            ContainerKind::from_path(Path::new("area.geojson.gz")),
            Some(ContainerKind::Gzip)
        );
        assert_eq!(ContainerKind::from_path(Path::new("area.geojson")), None);
    }
}
