// crates/riskarea-core/src/error.rs

//! Error taxonomy of the ingestion pipeline.

use std::path::Path;
use thiserror::Error;

/// Everything that can stop (or, for [`IngestError::UnsupportedFormat`],
/// merely skip) the processing of an uploaded object.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The object could not be fetched from the object store.
    #[error("could not download '{key}': {reason}")]
    Download { key: String, reason: String },

    /// The uploaded container is corrupt or uses an unsupported compression.
    #[error("could not extract '{path}': {reason}")]
    Extraction { path: String, reason: String },

    /// Member whose extension is not a supported geometry format.
    /// The orchestrator turns this into a skip.
    #[error("unsupported file extension '{extension}' for '{path}'")]
    UnsupportedFormat { path: String, extension: String },

    /// Malformed geometry file.
    #[error("could not parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// Nothing polygonal to union.
    #[error("feature collection contains no polygonal geometry")]
    EmptyGeometry,

    /// Store write failure (pool acquisition, constraint, network).
    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub(crate) fn extraction(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Extraction {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn download(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::Download {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// `true` for errors raised before any member was looked at.
    pub fn is_download(&self) -> bool {
        matches!(self, Self::Download { .. })
    }
}

#[cfg(feature = "postgis")]
impl From<sqlx::Error> for IngestError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_is_flagged() {
        let err = IngestError::download("a/b.zip", "NoSuchKey");
        assert!(err.is_download());
        assert_eq!(err.to_string(), "could not download 'a/b.zip': NoSuchKey");
        assert!(!IngestError::EmptyGeometry.is_download());
    }

    #[test]
    fn test_parse_message_names_file() {
        let err = IngestError::parse(Path::new("/tmp/x/area.kml"), "unexpected EOF");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x/area.kml"));
        assert!(msg.contains("unexpected EOF"));
    }
}
