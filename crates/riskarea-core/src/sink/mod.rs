// crates/riskarea-core/src/sink/mod.rs

//! # Persistence Sink
//!
//! Append-only destination of normalized records. There is no natural key:
//! appending the same record twice yields two rows.

use crate::error::Result;
use crate::record::RiskAreaRecord;

mod memory;
#[cfg(feature = "postgis")]
mod postgis;

pub use memory::MemorySink;
#[cfg(feature = "postgis")]
pub use postgis::PostGisSink;

pub trait RecordSink {
    /// Appends exactly one row. Never updates or deletes.
    fn append(&self, record: &RiskAreaRecord) -> Result<()>;

    /// Human-readable name of the destination relation.
    fn target(&self) -> &str;
}

impl<T: RecordSink + ?Sized> RecordSink for &T {
    fn append(&self, record: &RiskAreaRecord) -> Result<()> {
        (**self).append(record)
    }

    fn target(&self) -> &str {
        (**self).target()
    }
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn append(&self, record: &RiskAreaRecord) -> Result<()> {
        (**self).append(record)
    }

    fn target(&self) -> &str {
        (**self).target()
    }
}
