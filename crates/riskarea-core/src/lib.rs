// crates/riskarea-core/src/lib.rs

//! # riskarea-core
//!
//! Ingests risk-area boundary uploads (KML, GeoJSON, Shapefile, optionally
//! zipped) and appends one normalized multi-polygon row per file to a
//! PostGIS relation.
//!
//! ```no_run
//! use riskarea_core::{IngestConfig, Ingestor, LocalSource, MemorySink, TriggerEvent};
//!
//! let ingestor = Ingestor::new(
//!     LocalSource::new("/srv/objects"),
//!     MemorySink::default(),
//!     IngestConfig::default(),
//! );
//! let result = ingestor.handle(&TriggerEvent::for_object("areas", "setor+norte.zip"));
//! println!("{} {}", result.status_code, result.body);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod archive;
pub mod config;
pub mod error;
pub mod event;
pub mod feature;
pub mod format;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod record;
#[cfg(any(feature = "postgis", feature = "s3"))]
mod runtime;
pub mod sink;
pub mod source;

// Re-exports
pub use crate::config::{IngestConfig, PoolConfig};
pub use crate::error::{IngestError, Result};
pub use crate::event::{ObjectRef, RawUpload, TriggerEvent};
pub use crate::feature::{Feature, FeatureCollection};
pub use crate::format::{ContainerKind, FileFormat};
pub use crate::pipeline::{IngestReport, Ingestor, InvocationResult};
pub use crate::record::RiskAreaRecord;
pub use crate::sink::{MemorySink, RecordSink};
pub use crate::source::{LocalSource, ObjectSource};
#[cfg(feature = "postgis")]
pub use crate::sink::PostGisSink;
#[cfg(feature = "s3")]
pub use crate::source::S3Source;
