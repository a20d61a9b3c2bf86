use anyhow::{Result, bail};
use geo::MultiPolygon;

use crate::group::BoundaryGroup;
use crate::record::BoundaryRecord;

/// Merges one group into a single record. Every input polygon appears
/// exactly once in the output, in group order; no coordinate
/// transformation, simplification, or validity repair is performed.
pub fn merge_group(group: &BoundaryGroup) -> Result<BoundaryRecord> {
    let Some(base) = group.shapes.first() else {
        bail!("Empty boundary group: {}", group.key);
    };

    if group.len() == 1 {
        return Ok(BoundaryRecord::from_shape(base, base.geometry.clone(), 1));
    }

    let total: usize = group.shapes.iter().map(|s| s.polygon_count()).sum();
    let mut polygons = Vec::with_capacity(total);
    for shape in &group.shapes {
        polygons.extend(shape.geometry.0.iter().cloned());
    }

    Ok(BoundaryRecord::from_shape(base, MultiPolygon(polygons), group.len()))
}
