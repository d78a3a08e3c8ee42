//! Shared fixtures for pipeline tests.
#![allow(dead_code)]

use riskarea_core::{
    IngestConfig, IngestError, Ingestor, LocalSource, MemorySink, RecordSink, RiskAreaRecord,
};
use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const BUCKET: &str = "areas-risco";

/// Object store root plus scratch directory, both removed on drop.
pub struct Harness {
    pub objects: TempDir,
    pub scratch: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            objects: tempfile::tempdir().expect("objects dir"),
            scratch: tempfile::tempdir().expect("scratch dir"),
        }
    }

    pub fn config(&self) -> IngestConfig {
        IngestConfig {
            scratch_dir: self.scratch.path().to_path_buf(),
            ..IngestConfig::default()
        }
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        let path = self.objects.path().join(BUCKET).join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        path
    }

    pub fn put(&self, key: &str, body: &[u8]) {
        fs::write(self.object_path(key), body).unwrap();
    }

    pub fn put_zip(&self, key: &str, entries: &[(&str, String)]) {
        write_zip(&self.object_path(key), entries);
    }

    /// Zips existing files under their file names.
    pub fn put_zip_files(&self, key: &str, files: &[PathBuf]) {
        let mut writer = zip::ZipWriter::new(File::create(self.object_path(key)).unwrap());
        for file in files {
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(&fs::read(file).unwrap()).unwrap();
        }
        writer.finish().unwrap();
    }

    pub fn ingestor(&self) -> Ingestor<LocalSource, MemorySink> {
        self.ingestor_with(MemorySink::default())
    }

    pub fn ingestor_with<K: RecordSink>(&self, sink: K) -> Ingestor<LocalSource, K> {
        Ingestor::new(LocalSource::new(self.objects.path()), sink, self.config())
    }

    /// Entries left behind in the scratch directory.
    pub fn scratch_leftovers(&self) -> usize {
        fs::read_dir(self.scratch.path()).unwrap().count()
    }
}

pub fn write_zip(path: &Path, entries: &[(&str, String)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, body) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// GeoJSON FeatureCollection of axis-aligned squares `(x, y, size)`, each
/// feature carrying `properties`.
pub fn squares_geojson(squares: &[(f64, f64, f64)], properties: serde_json::Value) -> String {
    let features: Vec<_> = squares
        .iter()
        .map(|&(x, y, s)| {
            json!({
                "type": "Feature",
                "properties": properties,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, y], [x + s, y], [x + s, y + s], [x, y + s], [x, y]]]
                }
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

pub fn kml_square(nome: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Placemark>
  <name>Encosta</name>
  <ExtendedData><SchemaData><SimpleData name="nome">{nome}</SimpleData></SchemaData></ExtendedData>
  <Polygon><outerBoundaryIs><LinearRing>
    <coordinates>-46.0,-23.0 -45.0,-23.0 -45.0,-22.0 -46.0,-22.0 -46.0,-23.0</coordinates>
  </LinearRing></outerBoundaryIs></Polygon>
</Placemark></Document></kml>"#
    )
}

/// Writes `<dir>/<stem>.{shp,shx,dbf}` holding one unit square with the
/// `nome` and `descricao` dBase fields. Returns the three paths.
pub fn write_square_shapefile(
    dir: &Path,
    stem: &str,
    nome: &str,
    descricao: &str,
) -> Vec<PathBuf> {
    use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};
    use shapefile::{Point, Polygon, PolygonRing};

    let shp = dir.join(format!("{stem}.shp"));
    let table = TableWriterBuilder::new()
        .add_character_field("nome".try_into().unwrap(), 50)
        .add_character_field("descricao".try_into().unwrap(), 80);
    let mut writer = shapefile::Writer::from_path(&shp, table).unwrap();

    let square = Polygon::new(PolygonRing::Outer(vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 0.0),
    ]));
    let mut record = Record::default();
    record.insert("nome".to_string(), FieldValue::Character(Some(nome.to_string())));
    record.insert(
        "descricao".to_string(),
        FieldValue::Character(Some(descricao.to_string())),
    );
    writer.write_shape_and_record(&square, &record).unwrap();
    drop(writer);

    ["shp", "shx", "dbf"]
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .collect()
}

/// Sink that accepts `accept` rows, then fails every append.
pub struct FailingSink {
    pub inner: MemorySink,
    accept: usize,
    calls: AtomicUsize,
}

impl FailingSink {
    pub fn after(accept: usize) -> Self {
        Self {
            inner: MemorySink::default(),
            accept,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSink for FailingSink {
    fn append(&self, record: &RiskAreaRecord) -> riskarea_core::Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.accept {
            return Err(IngestError::Persistence(
                "connection pool timed out".to_string(),
            ));
        }
        self.inner.append(record)
    }

    fn target(&self) -> &str {
        self.inner.target()
    }
}
