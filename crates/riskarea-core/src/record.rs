// crates/riskarea-core/src/record.rs

//! The canonical output unit: one row of the target relation.

use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use geojson::JsonObject;
use serde_json::Value;

/// SRID every `area_risco` geometry is tagged with (lon/lat WGS84).
pub const SRID: i32 = 4326;

/// Normalized risk area, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAreaRecord {
    nome: String,
    em_risco: bool,
    descricao: String,
    created_at: DateTime<Utc>,
    area_risco: MultiPolygon<f64>,
}

impl RiskAreaRecord {
    pub(crate) fn new(
        nome: String,
        descricao: String,
        created_at: DateTime<Utc>,
        area_risco: MultiPolygon<f64>,
    ) -> Self {
        Self {
            nome,
            em_risco: true,
            descricao,
            created_at,
            area_risco,
        }
    }

    pub fn nome(&self) -> &str {
        &self.nome
    }

    /// Always `true`: only risk boundaries are ingested.
    pub fn em_risco(&self) -> bool {
        self.em_risco
    }

    pub fn descricao(&self) -> &str {
        &self.descricao
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn area_risco(&self) -> &MultiPolygon<f64> {
        &self.area_risco
    }

    pub fn srid(&self) -> i32 {
        SRID
    }

    /// The geometry alone, as a GeoJSON geometry object.
    pub fn geometry_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.area_risco))
    }

    /// The whole row as a GeoJSON feature (used for dry runs and inspection).
    pub fn to_geojson(&self) -> geojson::Feature {
        let mut properties = JsonObject::new();
        properties.insert("nome".into(), Value::String(self.nome.clone()));
        properties.insert("em_risco".into(), Value::Bool(self.em_risco));
        properties.insert("descricao".into(), Value::String(self.descricao.clone()));
        properties.insert(
            "created_at".into(),
            Value::String(self.created_at.to_rfc3339()),
        );
        properties.insert("srid".into(), Value::from(SRID));

        geojson::Feature {
            bbox: None,
            geometry: Some(self.geometry_geojson()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use geo::polygon;

    #[test]
    fn test_geojson_view() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = RiskAreaRecord::new(
            "Setor Norte".into(),
            "Descricao Inicial".into(),
            created_at,
            MultiPolygon::new(vec![square]),
        );

        let feature = record.to_geojson();
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["nome"], "Setor Norte");
        assert_eq!(props["em_risco"], true);
        assert_eq!(props["created_at"], "2024-05-01T12:00:00+00:00");
        assert!(matches!(
            feature.geometry.unwrap().value,
            geojson::Value::MultiPolygon(ref parts) if parts.len() == 1
        ));
    }
}
