// crates/riskarea-core/src/source/mod.rs

//! Object sources: where uploaded bytes come from.

use crate::error::Result;
use crate::event::ObjectRef;
use std::path::Path;

mod local;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalSource;
#[cfg(feature = "s3")]
pub use s3::S3Source;

pub trait ObjectSource {
    /// Writes the object's bytes to `dest`. Every failure is a
    /// [`crate::IngestError::Download`].
    fn fetch(&self, object: &ObjectRef, dest: &Path) -> Result<()>;
}

impl<T: ObjectSource + ?Sized> ObjectSource for &T {
    fn fetch(&self, object: &ObjectRef, dest: &Path) -> Result<()> {
        (**self).fetch(object, dest)
    }
}

impl<T: ObjectSource + ?Sized> ObjectSource for Box<T> {
    fn fetch(&self, object: &ObjectRef, dest: &Path) -> Result<()> {
        (**self).fetch(object, dest)
    }
}
