// crates/riskarea-core/src/normalize.rs

//! # Geometry Normalizer
//!
//! Collapses a feature collection into one [`RiskAreaRecord`]:
//! the union of all polygonal geometries as a multi-polygon, plus the
//! defaulted attribute set. No I/O happens here.

use crate::error::{IngestError, Result};
use crate::feature::FeatureCollection;
use crate::record::RiskAreaRecord;
use chrono::{DateTime, Utc};
use geo::{BooleanOps, Geometry, MultiPolygon, Polygon};
use serde_json::Value;

/// `nome` when the source has none.
pub const DEFAULT_NOME: &str = "Nome padrão";
/// `descricao` when the source has no `descricao` column.
pub const DEFAULT_DESCRICAO: &str = "Descricao Inicial";
/// `descricao` when the source has a `descricao` column, whatever its value.
pub const PLACEHOLDER_DESCRICAO: &str = "Descrição padrão";

/// Normalizes with `created_at` stamped now.
pub fn normalize(collection: &FeatureCollection) -> Result<RiskAreaRecord> {
    normalize_at(collection, Utc::now())
}

/// Normalizes with an explicit `created_at`.
pub fn normalize_at(
    collection: &FeatureCollection,
    created_at: DateTime<Utc>,
) -> Result<RiskAreaRecord> {
    let area = union_all(collection).ok_or(IngestError::EmptyGeometry)?;

    let nome = collection
        .first()
        .and_then(|feature| feature.attribute("nome"))
        .and_then(attribute_text)
        .unwrap_or_else(|| DEFAULT_NOME.to_string());

    // The source value is intentionally discarded; only presence matters.
    let descricao = if collection.has_column("descricao") {
        PLACEHOLDER_DESCRICAO
    } else {
        DEFAULT_DESCRICAO
    };

    Ok(RiskAreaRecord::new(
        nome,
        descricao.to_string(),
        created_at,
        area,
    ))
}

/// Union of every polygonal part, or `None` when there is none.
pub fn union_all(collection: &FeatureCollection) -> Option<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    let mut ignored = 0usize;
    for geometry in collection.geometries() {
        ignored += collect_polygons(geometry, &mut polygons);
    }
    if ignored > 0 {
        tracing::warn!(ignored, "non-polygonal geometries left out of the union");
    }

    // Balanced pairwise rounds; operands stay about the same size.
    let mut layer: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|polygon| MultiPolygon::new(vec![polygon]))
        .collect();
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut parts = layer.into_iter();
        while let Some(left) = parts.next() {
            next.push(match parts.next() {
                Some(right) => left.union(&right),
                None => left,
            });
        }
        layer = next;
    }
    layer.pop()
}

/// Pushes polygonal parts of `geometry`; returns how many non-polygonal
/// geometries were skipped.
fn collect_polygons(geometry: &Geometry<f64>, out: &mut Vec<Polygon<f64>>) -> usize {
    match geometry {
        Geometry::Polygon(polygon) => {
            out.push(polygon.clone());
            0
        }
        Geometry::MultiPolygon(multi) => {
            out.extend(multi.0.iter().cloned());
            0
        }
        Geometry::Rect(rect) => {
            out.push(rect.to_polygon());
            0
        }
        Geometry::Triangle(triangle) => {
            out.push(triangle.to_polygon());
            0
        }
        Geometry::GeometryCollection(collection) => collection
            .0
            .iter()
            .map(|member| collect_polygons(member, out))
            .sum(),
        _ => 1,
    }
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
