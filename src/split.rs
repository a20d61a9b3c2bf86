use anyhow::{Result, bail};
use geo::MultiPolygon;

use crate::group::BoundaryGroup;
use crate::pacer::Pacer;
use crate::record::BoundaryRecord;
use crate::store::BoundaryStore;

/// Shapes accumulated per sub-batch during chunked processing.
pub const CHUNK_SIZE: usize = 50;

/// Absolute shape-count ceiling for chunked processing. Groups above
/// this are skipped outright regardless of the configured threshold.
pub const CHUNK_CAP: usize = 1000;

/// Flattens an oversized group in fixed-size sub-batches, pacing
/// between batches, then attempts a single terminal insert.
///
/// Accumulation happens in memory; chunking bounds the pacing of the
/// flattening loop, not the final payload size. A failed insert fails
/// the whole attempt; the caller falls back to the skip outcome.
pub fn process_oversized(
    group: &BoundaryGroup,
    store: &mut dyn BoundaryStore,
    pacer: &dyn Pacer,
    verbose: u8,
) -> Result<()> {
    let Some(base) = group.shapes.first() else {
        bail!("Empty boundary group: {}", group.key);
    };

    let total = group.len();
    let batches = total.div_ceil(CHUNK_SIZE);
    let polygon_total: usize = group.shapes.iter().map(|s| s.polygon_count()).sum();

    let mut polygons = Vec::with_capacity(polygon_total);
    for (i, batch) in group.shapes.chunks(CHUNK_SIZE).enumerate() {
        if verbose > 0 {
            eprintln!("[split] {} batch {}/{}: {} shapes", group.key, i + 1, batches, batch.len());
        }
        for shape in batch {
            polygons.extend(shape.geometry.0.iter().cloned());
        }
        if i + 1 < batches {
            pacer.pause();
        }
    }

    let record = BoundaryRecord::from_shape(base, MultiPolygon(polygons), total);
    if verbose > 0 {
        eprintln!("[split] inserting {} ({} polygons)", group.key, record.geometry.0.len());
    }
    store.insert(&record)?;
    Ok(())
}
