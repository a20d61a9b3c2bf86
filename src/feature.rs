use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result, bail};
use geo::{LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// One GeoJSON feature as it appears in the source boundary dataset:
/// a geometry object plus the full attribute bag.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Raw geometry object. The type tag is kept as text so rejected
/// geometries can be reported by name; coordinates stay untyped until
/// the tag has been inspected.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// Reads and parses a GeoJSON feature collection from `path`.
/// A missing file, unparsable document, or absent feature list is fatal.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let collection: FeatureCollection = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse GeoJSON from {}", path.display()))?;
    Ok(collection)
}

/// Feature count and geometry-type breakdown for one parsed collection.
pub fn print_collection_stats(collection: &FeatureCollection) {
    println!("Number of features: {}", collection.features.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for feature in &collection.features {
        *counts.entry(feature.geometry.kind.as_str()).or_default() += 1;
    }
    println!("Geometry mix:");
    for (kind, count) in counts {
        println!("  - {}: {}", kind, count);
    }
}

/// GeoJSON rendering of a multi-polygon, as persisted in the store.
pub fn multi_polygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = mp.0.iter().map(polygon_rings).collect();
    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

fn polygon_rings(polygon: &Polygon<f64>) -> Value {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(ring_coords(polygon.exterior()));
    for hole in polygon.interiors() {
        rings.push(ring_coords(hole));
    }
    Value::Array(rings)
}

fn ring_coords(ring: &LineString<f64>) -> Value {
    Value::Array(ring.0.iter().map(|c| json!([c.x, c.y])).collect())
}
