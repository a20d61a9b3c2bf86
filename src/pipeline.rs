use anyhow::Result;

use crate::feature::FeatureCollection;
use crate::group;
use crate::key::ExistingKeySet;
use crate::merge;
use crate::pacer::Pacer;
use crate::report::{RunResult, SkippedGroup};
use crate::shape::{self, NormalizedShape};
use crate::split;
use crate::store::BoundaryStore;

/// Run-level knobs for one import.
#[derive(Debug, Clone, Copy)]
pub struct ImportConfig {
    /// Group size above which the normal merge path is not taken.
    pub skip_threshold: usize,
    pub verbose: u8,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { skip_threshold: 5000, verbose: 0 }
    }
}

/// Runs the full ingestion pipeline over one parsed collection:
/// validate and normalize, filter against existing units, group, merge
/// or chunk, write back. Shape-, group-, and write-level failures are
/// counted and skipped; only store-open and input-level problems abort.
pub fn run_import(
    collection: &FeatureCollection,
    store: &mut dyn BoundaryStore,
    write_pacer: &dyn Pacer,
    batch_pacer: &dyn Pacer,
    config: &ImportConfig,
) -> Result<RunResult> {
    let mut result = RunResult::default();

    // Validate and normalize every feature; rejects are counted, never fatal.
    let mut shapes: Vec<NormalizedShape> = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        match shape::normalize(feature) {
            Ok(shape) => shapes.push(shape),
            Err(err) => {
                eprintln!("[import] rejected feature: {err}");
                result.record_failure(format!("rejected feature: {err}"));
            }
        }
    }

    // The existing-key set is a pre-filter only; a failed scan degrades
    // to an empty set so the run can proceed.
    let existing = match store.existing_keys() {
        Ok(keys) => keys,
        Err(err) => {
            eprintln!("[import] existing-key scan failed, assuming empty store: {err}");
            ExistingKeySet::default()
        }
    };
    if config.verbose > 0 {
        eprintln!("[import] {} existing units", existing.len());
    }

    let grouped = group::group_shapes(shapes, &existing);
    result.duplicate_skipped = grouped.duplicate_skipped;
    if config.verbose > 0 {
        eprintln!("[import] {} groups to process", grouped.groups.len());
    }

    let mut records = Vec::new();
    for group in &grouped.groups {
        if group.len() > config.skip_threshold {
            if group.len() <= split::CHUNK_CAP {
                if config.verbose > 0 {
                    eprintln!(
                        "[import] chunking oversized group {} ({} shapes)",
                        group.key,
                        group.len()
                    );
                }
                match split::process_oversized(group, store, batch_pacer, config.verbose) {
                    Ok(()) => {
                        result.inserted += 1;
                        result.merged += 1;
                        result.chunked += 1;
                        continue;
                    }
                    Err(err) => {
                        eprintln!("[import] chunked processing failed for {}: {err}", group.key);
                    }
                }
            }
            eprintln!(
                "[import] skipping {}: {} shapes exceeds the limit",
                group.key,
                group.len()
            );
            result.oversized_skipped += 1;
            result.skipped.push(SkippedGroup { key: group.key.clone(), count: group.len() });
            continue;
        }

        match merge::merge_group(group) {
            Ok(record) => {
                if group.len() > 1 {
                    result.merged += 1;
                    if config.verbose > 0 {
                        eprintln!("[import] merged {} ({} shapes)", group.key, group.len());
                    }
                }
                records.push(record);
            }
            Err(err) => {
                eprintln!("[import] merge failed for {}: {err}", group.key);
                result.record_failure(format!("merge failed for {}: {err}", group.key));
            }
        }
    }

    // Write back one record at a time, pacing between writes. A failed
    // insert never blocks the records after it.
    let total = records.len();
    for (i, record) in records.iter().enumerate() {
        match store.insert(record) {
            Ok(()) => result.inserted += 1,
            Err(err) => {
                eprintln!("[import] insert failed for {}: {err}", record.full_address);
                result.record_failure(format!("insert failed for {}: {err}", record.full_address));
            }
        }
        if i + 1 < total {
            write_pacer.pause();
        }
    }

    Ok(result)
}
