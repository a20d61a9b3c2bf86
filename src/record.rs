use geo::MultiPolygon;
use serde_json::{Map, Value};

use crate::feature;
use crate::key::AdminKey;
use crate::shape::NormalizedShape;

/// The unit of persistence: one consolidated multi-polygon per
/// administrative unit. Constructed once per group, written once, never
/// mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct BoundaryRecord {
    pub prefecture_code: String,
    pub prefecture_name: String,
    pub city_name: Option<String>,
    pub district_name: Option<String>,
    pub area_name: Option<String>,
    pub additional_code: String,
    pub full_address: String,
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
    pub is_merged: bool,
    pub original_count: usize,
}

impl BoundaryRecord {
    /// Builds a record from a representative shape, an already-merged
    /// geometry, and the size of the group it came from.
    pub fn from_shape(
        base: &NormalizedShape,
        geometry: MultiPolygon<f64>,
        original_count: usize,
    ) -> Self {
        Self {
            prefecture_code: base.prefecture_code().to_string(),
            prefecture_name: base.prefecture.clone(),
            city_name: base.city.clone(),
            district_name: base.district.clone(),
            area_name: base.area.clone(),
            additional_code: base.code.clone(),
            full_address: base.full_address(),
            geometry,
            properties: base.properties.clone(),
            is_merged: original_count > 1,
            original_count,
        }
    }

    pub fn key(&self) -> AdminKey {
        AdminKey::new(
            self.prefecture_name.clone(),
            self.city_name.clone(),
            self.district_name.clone(),
        )
    }

    /// GeoJSON rendering of the merged geometry, as persisted.
    pub fn geometry_json(&self) -> Value {
        feature::multi_polygon_to_geojson(&self.geometry)
    }

    /// The attribute bag of the representative shape, as persisted.
    pub fn properties_json(&self) -> Value {
        Value::Object(self.properties.clone())
    }
}
