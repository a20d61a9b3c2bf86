use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::feature::{Feature, Geometry};
use crate::key::AdminKey;

/// Attribute names used by the national administrative boundary dataset.
pub const PREFECTURE_FIELD: &str = "N03_001"; // 都道府県名
pub const AREA_FIELD: &str = "N03_002"; // 振興局・支庁名
pub const CITY_FIELD: &str = "N03_003"; // 郡・市名
pub const DISTRICT_FIELD: &str = "N03_004"; // 町・字等名
pub const CODE_FIELD: &str = "N03_007"; // 行政区域コード

/// Why one input feature was rejected. Rejections are counted by the
/// caller; they never abort a run.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("unsupported geometry type {0}")]
    UnsupportedGeometry(String),

    #[error("malformed {0} coordinates")]
    BadCoordinates(&'static str),
}

/// A validated input feature: geometry forced to `MultiPolygon`, the
/// attributes needed for key building extracted up front, the full
/// attribute bag carried along for persistence.
#[derive(Debug, Clone)]
pub struct NormalizedShape {
    pub geometry: MultiPolygon<f64>,
    pub prefecture: String,
    pub area: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub code: String,
    pub properties: Map<String, Value>,
}

impl NormalizedShape {
    /// 2-digit prefecture prefix of the hierarchical code.
    pub fn prefecture_code(&self) -> &str {
        let end = self.code.char_indices().nth(2).map_or(self.code.len(), |(i, _)| i);
        &self.code[..end]
    }

    /// Concatenation of prefecture, sub-region, city, and district, in
    /// that order, with absent components dropped and no separator.
    pub fn full_address(&self) -> String {
        let mut address = self.prefecture.clone();
        for part in [&self.area, &self.city, &self.district].into_iter().flatten() {
            address.push_str(part);
        }
        address
    }

    pub fn key(&self) -> AdminKey {
        AdminKey::new(self.prefecture.clone(), self.city.clone(), self.district.clone())
    }

    /// Number of polygons in this shape's multi-polygon.
    pub fn polygon_count(&self) -> usize {
        self.geometry.0.len()
    }
}

/// Validates one raw feature and normalizes its geometry.
pub fn normalize(feature: &Feature) -> Result<NormalizedShape, ShapeError> {
    let props = &feature.properties;
    let prefecture = required_text(props, PREFECTURE_FIELD)?;
    let code = required_text(props, CODE_FIELD)?;
    let geometry = to_multi_polygon(&feature.geometry)?;

    Ok(NormalizedShape {
        geometry,
        prefecture,
        area: optional_text(props, AREA_FIELD),
        city: optional_text(props, CITY_FIELD),
        district: optional_text(props, DISTRICT_FIELD),
        code,
        properties: props.clone(),
    })
}

fn required_text(props: &Map<String, Value>, field: &'static str) -> Result<String, ShapeError> {
    optional_text(props, field).ok_or(ShapeError::MissingField(field))
}

/// Missing, null, and empty-string attributes are all treated as absent.
fn optional_text(props: &Map<String, Value>, field: &str) -> Option<String> {
    props
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

type Ring = Vec<[f64; 2]>;

/// `Polygon` is wrapped as a single-element `MultiPolygon`;
/// `MultiPolygon` passes through unchanged. Anything else is rejected.
pub fn to_multi_polygon(geometry: &Geometry) -> Result<MultiPolygon<f64>, ShapeError> {
    match geometry.kind.as_str() {
        "Polygon" => {
            let rings: Vec<Ring> = parse_coords(geometry, "Polygon")?;
            Ok(MultiPolygon(vec![polygon_from_rings(rings)?]))
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Ring>> = parse_coords(geometry, "MultiPolygon")?;
            let polygons = polygons
                .into_iter()
                .map(polygon_from_rings)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => Err(ShapeError::UnsupportedGeometry(other.to_string())),
    }
}

fn parse_coords<T: DeserializeOwned>(
    geometry: &Geometry,
    kind: &'static str,
) -> Result<T, ShapeError> {
    serde_json::from_value(geometry.coordinates.clone())
        .map_err(|_| ShapeError::BadCoordinates(kind))
}

/// First ring is the exterior, the rest are holes (GeoJSON ordering).
fn polygon_from_rings(rings: Vec<Ring>) -> Result<Polygon<f64>, ShapeError> {
    let mut rings = rings.into_iter().map(ring_to_line_string);
    let exterior = rings.next().ok_or(ShapeError::BadCoordinates("Polygon"))?;
    Ok(Polygon::new(exterior, rings.collect()))
}

fn ring_to_line_string(ring: Ring) -> LineString<f64> {
    LineString(ring.into_iter().map(|[x, y]| Coord { x, y }).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::feature::Feature;

    fn feature(value: serde_json::Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    fn square() -> serde_json::Value {
        json!([[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn polygon_wraps_to_single_element_multi_polygon() {
        let f = feature(json!({
            "geometry": { "type": "Polygon", "coordinates": square() },
            "properties": { "N03_001": "東京都", "N03_007": "13101" },
        }));
        let shape = normalize(&f).unwrap();
        assert_eq!(shape.polygon_count(), 1);
        assert_eq!(shape.geometry.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn multi_polygon_passes_through() {
        let f = feature(json!({
            "geometry": { "type": "MultiPolygon", "coordinates": [square(), square()] },
            "properties": { "N03_001": "東京都", "N03_007": "13101" },
        }));
        let shape = normalize(&f).unwrap();
        assert_eq!(shape.polygon_count(), 2);
    }

    #[test]
    fn missing_prefecture_is_rejected() {
        let f = feature(json!({
            "geometry": { "type": "Polygon", "coordinates": square() },
            "properties": { "N03_007": "13101" },
        }));
        assert!(matches!(
            normalize(&f),
            Err(ShapeError::MissingField(PREFECTURE_FIELD))
        ));
    }

    #[test]
    fn missing_code_is_rejected() {
        let f = feature(json!({
            "geometry": { "type": "Polygon", "coordinates": square() },
            "properties": { "N03_001": "東京都" },
        }));
        assert!(matches!(normalize(&f), Err(ShapeError::MissingField(CODE_FIELD))));
    }

    #[test]
    fn point_geometry_is_rejected() {
        let f = feature(json!({
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "N03_001": "東京都", "N03_007": "13101" },
        }));
        match normalize(&f) {
            Err(ShapeError::UnsupportedGeometry(kind)) => assert_eq!(kind, "Point"),
            other => panic!("expected unsupported geometry, got {other:?}"),
        }
    }

    #[test]
    fn address_concatenates_non_empty_parts_in_order() {
        let f = feature(json!({
            "geometry": { "type": "Polygon", "coordinates": square() },
            "properties": {
                "N03_001": "北海道",
                "N03_002": "石狩振興局",
                "N03_003": "札幌市",
                "N03_004": "中央区",
                "N03_007": "01101",
            },
        }));
        let shape = normalize(&f).unwrap();
        assert_eq!(shape.full_address(), "北海道石狩振興局札幌市中央区");
        assert_eq!(shape.prefecture_code(), "01");
    }

    #[test]
    fn empty_string_attributes_are_absent() {
        let f = feature(json!({
            "geometry": { "type": "Polygon", "coordinates": square() },
            "properties": { "N03_001": "東京都", "N03_003": "", "N03_007": "13101" },
        }));
        let shape = normalize(&f).unwrap();
        assert_eq!(shape.city, None);
        assert_eq!(shape.full_address(), "東京都");
    }
}
