// crates/riskarea-core/src/event.rs

//! Trigger payload: the object-store notification for one uploaded object.

use crate::error::{IngestError, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Notification as delivered by the object store. Only the first record is
/// processed per invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectEntity {
    /// URL-encoded (form style: `+` is a space).
    pub key: String,
}

/// A stored object: container identifier plus decoded key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

/// The uploaded object once it sits on local scratch storage.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub object: ObjectRef,
    pub path: PathBuf,
}

impl TriggerEvent {
    /// Builds a single-record event; mostly useful to callers that already
    /// know bucket and raw key.
    pub fn for_object(bucket: &str, raw_key: &str) -> Self {
        Self {
            records: vec![EventRecord {
                s3: S3Entity {
                    bucket: BucketEntity {
                        name: bucket.to_string(),
                    },
                    object: ObjectEntity {
                        key: raw_key.to_string(),
                    },
                },
            }],
        }
    }

    /// The object named by the first record, with its key decoded.
    pub fn object(&self) -> Result<ObjectRef> {
        let record = self
            .records
            .first()
            .ok_or_else(|| IngestError::download("", "notification carries no records"))?;
        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: decode_key(&record.s3.object.key),
        })
    }
}

impl ObjectRef {
    /// Last path segment of the key (the file name on scratch storage).
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl RawUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Form-decodes an object key: `+` becomes a space, then `%XX` escapes are
/// decoded. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Records": [{
            "eventSource": "aws:s3",
            "s3": {
                "bucket": {"name": "areas-risco", "arn": "arn:aws:s3:::areas-risco"},
                "object": {"key": "uploads/Setor+Norte%C3%A1.zip", "size": 1024}
            }
        }]
    }"#;

    #[test]
    fn test_parses_notification_and_decodes_key() {
        let event: TriggerEvent = serde_json::from_str(SAMPLE).unwrap();
        let object = event.object().unwrap();
        assert_eq!(object.bucket, "areas-risco");
        assert_eq!(object.key, "uploads/Setor Norteá.zip");
        assert_eq!(object.file_name(), "Setor Norteá.zip");
    }

    #[test]
    fn test_literal_plus_is_percent_encoded() {
        assert_eq!(decode_key("a%2Bb+c.kml"), "a+b c.kml");
        assert_eq!(decode_key("plain.geojson"), "plain.geojson");
    }

    #[test]
    fn test_empty_notification_is_download_error() {
        let event: TriggerEvent = serde_json::from_str("{}").unwrap();
        assert!(event.object().unwrap_err().is_download());
    }

    #[test]
    fn test_for_object_round_trips_through_object() {
        let event = TriggerEvent::for_object("b", "dir/x%20y.kml");
        let object = event.object().unwrap();
        assert_eq!(object.key, "dir/x y.kml");
        assert_eq!(object.file_name(), "x y.kml");
    }
}
