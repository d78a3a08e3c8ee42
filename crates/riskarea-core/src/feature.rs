// crates/riskarea-core/src/feature.rs

//! Generic feature table produced by the loaders.

use geo::Geometry;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute name -> value. Keys are unique per feature.
pub type Attributes = BTreeMap<String, Value>;

/// One row of a geometry file: an optional geometry plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry<f64>>,
    pub attributes: Attributes,
}

/// Ordered features parsed from one member file.
///
/// Columns follow table semantics: a column exists when any feature carries
/// the attribute, even if the first feature does not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry<f64>>, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn first(&self) -> Option<&Feature> {
        self.features.first()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|f| f.attributes.contains_key(name))
    }

    /// Geometries in feature order, skipping features without one.
    pub fn geometries(&self) -> impl Iterator<Item = &Geometry<f64>> {
        self.features.iter().filter_map(|f| f.geometry.as_ref())
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;
    use serde_json::json;

    #[test]
    fn test_column_present_on_any_feature() {
        let mut attrs = Attributes::new();
        attrs.insert("descricao".into(), json!("x"));
        let fc: FeatureCollection = vec![
            Feature::new(None, Attributes::new()),
            Feature::new(Some(point!(x: 1.0, y: 2.0).into()), attrs),
        ]
        .into_iter()
        .collect();

        assert!(fc.has_column("descricao"));
        assert!(!fc.has_column("nome"));
        assert_eq!(fc.geometries().count(), 1);
        assert!(fc.first().unwrap().attribute("descricao").is_none());
    }
}
