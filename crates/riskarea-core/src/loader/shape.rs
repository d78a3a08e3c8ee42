// crates/riskarea-core/src/loader/shape.rs

//! ESRI Shapefile reader. The `.shp` path is given; the `.dbf` (and `.shx`)
//! sidecars must sit next to it.

use crate::error::{IngestError, Result};
use crate::feature::{Attributes, Feature, FeatureCollection};
use geo::Geometry;
use serde_json::Value;
use shapefile::dbase::FieldValue;
use shapefile::Shape;
use std::collections::HashMap;
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<FeatureCollection> {
    let mut reader = shapefile::Reader::from_path(path).map_err(|e| IngestError::parse(path, e))?;

    let mut features = Vec::new();
    for item in reader.iter_shapes_and_records() {
        let (shape, record) = item.map_err(|e| IngestError::parse(path, e))?;
        let geometry = match shape {
            Shape::NullShape => None,
            shape => Some(Geometry::<f64>::try_from(shape).map_err(|e| IngestError::parse(path, e))?),
        };
        let attributes: Attributes = HashMap::<String, FieldValue>::from(record)
            .into_iter()
            .map(|(name, value)| (name, field_to_json(value)))
            .collect();
        features.push(Feature::new(geometry, attributes));
    }

    Ok(FeatureCollection::new(features))
}

/// dBase value -> JSON. Dates keep their debug rendering.
fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(text) => text
            .map(|t| Value::String(t.trim_end().to_string()))
            .unwrap_or(Value::Null),
        FieldValue::Memo(text) => Value::String(text),
        FieldValue::Numeric(n) => n.map(Value::from).unwrap_or(Value::Null),
        FieldValue::Float(n) => n.map(|f| Value::from(f64::from(f))).unwrap_or(Value::Null),
        FieldValue::Double(n) | FieldValue::Currency(n) => Value::from(n),
        FieldValue::Integer(n) => Value::from(n),
        FieldValue::Logical(b) => b.map(Value::Bool).unwrap_or(Value::Null),
        other => Value::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_values() {
        assert_eq!(
            field_to_json(FieldValue::Character(Some("Setor Norte".into()))),
            json!("Setor Norte")
        );
        assert_eq!(field_to_json(FieldValue::Character(None)), Value::Null);
        assert_eq!(field_to_json(FieldValue::Numeric(Some(2.5))), json!(2.5));
        assert_eq!(field_to_json(FieldValue::Integer(7)), json!(7));
        assert_eq!(field_to_json(FieldValue::Logical(Some(true))), json!(true));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("nada.shp")).unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}
