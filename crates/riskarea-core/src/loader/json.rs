// crates/riskarea-core/src/loader/json.rs

use super::read_text;
use crate::error::{IngestError, Result};
use crate::feature::{Attributes, Feature, FeatureCollection};
use geo::Geometry;
use geojson::GeoJson;
use std::path::Path;

/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
pub(super) fn read(path: &Path) -> Result<FeatureCollection> {
    let text = read_text(path)?;
    let document: GeoJson = text.parse().map_err(|e| IngestError::parse(path, e))?;

    let features = match document {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(|feature| convert_feature(path, feature))
            .collect::<Result<Vec<_>>>()?,
        GeoJson::Feature(feature) => vec![convert_feature(path, feature)?],
        GeoJson::Geometry(geometry) => {
            vec![Feature::new(Some(to_geo(path, geometry)?), Attributes::new())]
        }
    };

    Ok(FeatureCollection::new(features))
}

fn convert_feature(path: &Path, feature: geojson::Feature) -> Result<Feature> {
    let geometry = feature
        .geometry
        .map(|geometry| to_geo(path, geometry))
        .transpose()?;
    let attributes: Attributes = feature.properties.unwrap_or_default().into_iter().collect();
    Ok(Feature::new(geometry, attributes))
}

fn to_geo(path: &Path, geometry: geojson::Geometry) -> Result<Geometry<f64>> {
    Geometry::<f64>::try_from(geometry).map_err(|e| IngestError::parse(path, e))
}
