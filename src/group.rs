use ahash::AHashMap;

use crate::key::{AdminKey, ExistingKeySet};
use crate::shape::NormalizedShape;

/// All shapes sharing one `AdminKey`, in input order.
#[derive(Debug)]
pub struct BoundaryGroup {
    pub key: AdminKey,
    pub shapes: Vec<NormalizedShape>,
}

impl BoundaryGroup {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Outcome of bucketing one run's shapes.
#[derive(Debug, Default)]
pub struct Grouped {
    /// Groups in first-seen key order.
    pub groups: Vec<BoundaryGroup>,
    /// Shapes dropped because their key was already persisted.
    pub duplicate_skipped: usize,
}

/// Buckets shapes by administrative key, dropping any whose key already
/// exists in the store. Shapes keep input order within each group.
pub fn group_shapes(shapes: Vec<NormalizedShape>, existing: &ExistingKeySet) -> Grouped {
    let mut grouped = Grouped::default();
    let mut index: AHashMap<AdminKey, usize> = AHashMap::new();

    for shape in shapes {
        let key = shape.key();
        if existing.contains(&key) {
            grouped.duplicate_skipped += 1;
            continue;
        }
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = grouped.groups.len();
                index.insert(key.clone(), slot);
                grouped.groups.push(BoundaryGroup { key, shapes: Vec::new() });
                slot
            }
        };
        grouped.groups[slot].shapes.push(shape);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::key::ExistingKeySet;
    use crate::shape::{NormalizedShape, normalize};

    fn shape(pref: &str, city: Option<&str>, code: &str) -> NormalizedShape {
        let feature = serde_json::from_value(json!({
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]],
            },
            "properties": {
                "N03_001": pref,
                "N03_003": city,
                "N03_007": code,
            },
        }))
        .unwrap();
        normalize(&feature).unwrap()
    }

    #[test]
    fn shapes_with_equal_keys_share_a_group() {
        let shapes = vec![
            shape("東京都", Some("A市"), "13101"),
            shape("東京都", Some("B市"), "13102"),
            shape("東京都", Some("A市"), "13101"),
        ];
        let grouped = group_shapes(shapes, &ExistingKeySet::default());
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].len(), 2);
        assert_eq!(grouped.groups[1].len(), 1);
        assert_eq!(grouped.duplicate_skipped, 0);
    }

    #[test]
    fn existing_keys_are_filtered_without_leakage() {
        let shapes = vec![
            shape("東京都", Some("A市"), "13101"),
            shape("東京都", Some("A市"), "13101"),
            shape("東京都", Some("B市"), "13102"),
        ];
        let mut existing = ExistingKeySet::default();
        existing.insert(shapes[0].key());

        let grouped = group_shapes(shapes, &existing);
        assert_eq!(grouped.duplicate_skipped, 2);
        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.groups[0].key.city.as_deref(), Some("B市"));
    }
}
