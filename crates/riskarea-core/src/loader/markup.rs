// crates/riskarea-core/src/loader/markup.rs

//! KML reader.
//!
//! Each `Placemark` (at any depth under Document/Folder) is one feature.
//! Column naming matches the usual geospatial KML driver: `<name>` ->
//! `Name`, `<description>` -> `Description`, extended data fields under
//! their own name.

use super::read_text;
use crate::error::{IngestError, Result};
use crate::feature::{Attributes, Feature, FeatureCollection};
use geo::{Coord, Geometry, GeometryCollection, LineString, Point, Polygon};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<FeatureCollection> {
    let text = read_text(path)?;
    let root = parse_tree(path, &text)?;

    let mut placemarks = Vec::new();
    root.collect_named("Placemark", &mut placemarks);

    placemarks
        .into_iter()
        .map(|placemark| convert_placemark(path, placemark))
        .collect()
}

// -----------------------------------------------------------------------------
// MINIMAL ELEMENT TREE
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Element {
    /// Local name (namespace prefix dropped).
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn text(&self) -> &str {
        self.text.trim()
    }

    /// Depth-first search; does not descend into matches.
    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            } else {
                child.collect_named(name, out);
            }
        }
    }
}

fn parse_tree(path: &Path, xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Synthetic document node at the bottom of the stack.
    let mut stack = vec![Element::named("#document")];

    loop {
        match reader.read_event().map_err(|e| IngestError::parse(path, e))? {
            Event::Start(start) => stack.push(element_from(path, &start)?),
            Event::Empty(start) => {
                let element = element_from(path, &start)?;
                top(&mut stack).children.push(element);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(IngestError::parse(path, "unbalanced closing tag"));
                }
                if let Some(done) = stack.pop() {
                    top(&mut stack).children.push(done);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| IngestError::parse(path, e))?;
                top(&mut stack).text.push_str(&text);
            }
            Event::CData(data) => {
                top(&mut stack).text.push_str(&String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(IngestError::parse(path, "unclosed element at end of document")),
    }
}

fn top(stack: &mut [Element]) -> &mut Element {
    // The document node is never popped while parsing.
    let last = stack.len() - 1;
    &mut stack[last]
}

fn element_from(path: &Path, start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::named(&String::from_utf8_lossy(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| IngestError::parse(path, e))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| IngestError::parse(path, e))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

// -----------------------------------------------------------------------------
// PLACEMARK -> FEATURE
// -----------------------------------------------------------------------------

fn convert_placemark(path: &Path, placemark: &Element) -> Result<Feature> {
    let mut attributes = Attributes::new();
    if let Some(name) = placemark.child("name") {
        attributes.insert("Name".into(), Value::String(name.text().to_string()));
    }
    if let Some(description) = placemark.child("description") {
        attributes.insert(
            "Description".into(),
            Value::String(description.text().to_string()),
        );
    }
    if let Some(extended) = placemark.child("ExtendedData") {
        read_extended_data(extended, &mut attributes);
    }

    let mut geometry = None;
    for child in &placemark.children {
        if let Some(g) = convert_geometry(path, child)? {
            geometry = Some(g);
            break;
        }
    }

    Ok(Feature::new(geometry, attributes))
}

/// `<Data name=".."><value>..</value></Data>` and
/// `<SchemaData><SimpleData name="..">..</SimpleData></SchemaData>`.
fn read_extended_data(extended: &Element, attributes: &mut Attributes) {
    for data in extended.children_named("Data") {
        if let Some(name) = data.attr("name") {
            let value = data.child("value").map(Element::text).unwrap_or_default();
            attributes.insert(name.to_string(), Value::String(value.to_string()));
        }
    }
    for schema_data in extended.children_named("SchemaData") {
        for simple in schema_data.children_named("SimpleData") {
            if let Some(name) = simple.attr("name") {
                attributes.insert(name.to_string(), Value::String(simple.text().to_string()));
            }
        }
    }
}

/// `Ok(None)` for elements that are not geometries.
fn convert_geometry(path: &Path, element: &Element) -> Result<Option<Geometry<f64>>> {
    let geometry = match element.name.as_str() {
        "Point" => {
            let coord = coordinates(path, element)?
                .into_iter()
                .next()
                .ok_or_else(|| IngestError::parse(path, "Point without coordinates"))?;
            Geometry::Point(Point(coord))
        }
        "LineString" | "LinearRing" => {
            Geometry::LineString(LineString::new(coordinates(path, element)?))
        }
        "Polygon" => Geometry::Polygon(convert_polygon(path, element)?),
        "MultiGeometry" => {
            let mut parts = Vec::new();
            for child in &element.children {
                if let Some(part) = convert_geometry(path, child)? {
                    parts.push(part);
                }
            }
            Geometry::GeometryCollection(GeometryCollection::new_from(parts))
        }
        _ => return Ok(None),
    };
    Ok(Some(geometry))
}

fn convert_polygon(path: &Path, element: &Element) -> Result<Polygon<f64>> {
    let exterior = element
        .child("outerBoundaryIs")
        .and_then(|boundary| boundary.child("LinearRing"))
        .ok_or_else(|| IngestError::parse(path, "Polygon without outerBoundaryIs"))?;
    let exterior = LineString::new(coordinates(path, exterior)?);

    let interiors = element
        .children_named("innerBoundaryIs")
        .filter_map(|boundary| boundary.child("LinearRing"))
        .map(|ring| coordinates(path, ring).map(LineString::new))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn coordinates(path: &Path, element: &Element) -> Result<Vec<Coord<f64>>> {
    let text = element.child("coordinates").map(Element::text).unwrap_or_default();
    parse_coordinates(text).map_err(|reason| IngestError::parse(path, reason))
}

/// Whitespace-separated `lon,lat[,alt]` tuples; altitude is dropped.
fn parse_coordinates(text: &str) -> std::result::Result<Vec<Coord<f64>>, String> {
    text.split_whitespace()
        .map(|tuple| {
            let mut parts = tuple.split(',').map(str::trim);
            let x = parts.next().and_then(|v| v.parse::<f64>().ok());
            let y = parts.next().and_then(|v| v.parse::<f64>().ok());
            match (x, y) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(format!("invalid coordinate tuple '{tuple}'")),
            }
        })
        .collect()
}
