// crates/riskarea-core/src/source/local.rs

use super::ObjectSource;
use crate::error::{IngestError, Result};
use crate::event::ObjectRef;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Serves objects from a directory tree laid out as `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, object: &ObjectRef) -> Result<PathBuf> {
        let relative = Path::new(&object.bucket).join(&object.key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(IngestError::download(
                &object.key,
                "object path leaves the source root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectSource for LocalSource {
    fn fetch(&self, object: &ObjectRef, dest: &Path) -> Result<()> {
        let source = self.resolve(object)?;
        fs::copy(&source, dest)
            .map(|_| ())
            .map_err(|e| IngestError::download(&object.key, format!("{}: {e}", source.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(bucket: &str, key: &str) -> ObjectRef {
        ObjectRef {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    #[test]
    fn test_fetch_copies_object() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/uploads")).unwrap();
        fs::write(dir.path().join("b/uploads/a.kml"), "<kml/>").unwrap();

        let source = LocalSource::new(dir.path());
        let dest = dir.path().join("copy.kml");
        source.fetch(&object("b", "uploads/a.kml"), &dest).unwrap();
        assert_eq!(fs::read_to_string(dest).unwrap(), "<kml/>");
    }

    #[test]
    fn test_missing_object_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalSource::new(dir.path());
        let err = source
            .fetch(&object("b", "nada.zip"), &dir.path().join("x"))
            .unwrap_err();
        assert!(err.is_download());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let source = LocalSource::new("/srv/objects");
        let err = source.resolve(&object("b", "../../etc/passwd")).unwrap_err();
        assert!(err.is_download());
    }
}
