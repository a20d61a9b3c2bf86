use std::hash::Hash;

use ahash::AHashMap;
use anyhow::Result;

use crate::cli::{CheckDuplicatesArgs, Cli, StoreArgs};
use crate::commands::database_path;
use crate::store::{BoundaryStore, SqliteStore, StoredBoundary};

/// Columns the import pipeline depends on.
const REQUIRED_COLUMNS: [&str; 5] =
    ["full_address", "geojson", "properties", "is_merged", "original_count"];

/// Schema-presence check. Opening the store creates missing pieces, so
/// this reports the resulting table layout.
pub fn check_schema(_cli: &Cli, args: &StoreArgs) -> Result<()> {
    let store = SqliteStore::open(&database_path(args)?)?;
    let columns = store.table_columns()?;

    println!("admin_boundaries columns:");
    for column in &columns {
        println!("  - {column}");
    }

    let missing: Vec<_> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|have| have == *required))
        .collect();
    if missing.is_empty() {
        println!("Schema OK.");
    } else {
        for column in missing {
            println!("Missing column: {column}");
        }
    }
    Ok(())
}

pub fn check_duplicates(_cli: &Cli, args: &CheckDuplicatesArgs) -> Result<()> {
    let mut store = SqliteStore::open(&database_path(&args.store)?)?;
    if args.detailed {
        check_duplicates_detailed(&mut store)
    } else {
        check_duplicates_shallow(&mut store)
    }
}

/// Duplicate-consolidation re-check over already-persisted data.
pub fn merge(_cli: &Cli, args: &StoreArgs) -> Result<()> {
    let mut store = SqliteStore::open(&database_path(args)?)?;
    run_consolidation_check(&mut store)
}

/// Detailed duplicate check with a shallow fallback; findings are
/// reported, never acted on.
pub fn run_consolidation_check(store: &mut dyn BoundaryStore) -> Result<()> {
    println!("Checking persisted units for duplicates...");
    if let Err(err) = check_duplicates_detailed(store) {
        eprintln!("[audit] detailed check failed, falling back to shallow scan: {err}");
        check_duplicates_shallow(store)?;
    }
    println!("Duplicate check complete. Any duplicates are listed above.");
    Ok(())
}

/// Unmerged rows grouped by administrative key.
pub fn check_duplicates_shallow(store: &mut dyn BoundaryStore) -> Result<()> {
    let rows = store.scan()?;
    let unmerged: Vec<&StoredBoundary> = rows.iter().filter(|r| !r.is_merged).collect();
    let groups = group_rows(unmerged.iter().copied(), StoredBoundary::key);
    let duplicates: Vec<_> = groups.iter().filter(|(_, rows)| rows.len() > 1).collect();

    if duplicates.is_empty() {
        println!("No duplicate administrative units found.");
        return Ok(());
    }

    println!("{} duplicate administrative units found:", duplicates.len());
    for (_, rows) in &duplicates {
        println!("  - {}: {} polygons", rows[0].full_address, rows.len());
    }
    println!("Run `bndimport merge` for a detailed breakdown.");
    Ok(())
}

/// Whole-table statistics, key-level duplicates among unmerged rows,
/// and exact duplicates across every descriptive field.
pub fn check_duplicates_detailed(store: &mut dyn BoundaryStore) -> Result<()> {
    let rows = store.scan()?;
    let merged = rows.iter().filter(|r| r.is_merged).count();

    println!("=== Store statistics ===");
    println!("Total records: {}", rows.len());
    println!("Merged: {merged}");
    println!("Unmerged: {}", rows.len() - merged);

    let unmerged: Vec<&StoredBoundary> = rows.iter().filter(|r| !r.is_merged).collect();

    let by_key = group_rows(unmerged.iter().copied(), StoredBoundary::key);
    let duplicates: Vec<_> = by_key.iter().filter(|(_, rows)| rows.len() > 1).collect();

    println!("\n=== Duplicates by administrative key ===");
    if duplicates.is_empty() {
        println!("No duplicate administrative units found.");
    } else {
        println!("{} duplicate groups found:", duplicates.len());
        for (key, rows) in duplicates.iter().take(10) {
            println!("  - {}: {} unmerged polygons", key, rows.len());
            println!("    area names: {}", joined(rows, |r| r.area_name.as_deref()));
            println!("    codes: {}", joined(rows, |r| r.additional_code.as_deref()));
        }
        if duplicates.len() > 10 {
            println!("  ... {} more", duplicates.len() - 10);
        }
    }

    let by_all_fields = group_rows(unmerged.iter().copied(), |r| {
        format!(
            "{}|{}|{}|{}|{}",
            r.prefecture_name,
            r.city_name.as_deref().unwrap_or("NULL"),
            r.district_name.as_deref().unwrap_or("NULL"),
            r.area_name.as_deref().unwrap_or("NULL"),
            r.additional_code.as_deref().unwrap_or("NULL"),
        )
    });
    let exact: Vec<_> = by_all_fields.iter().filter(|(_, rows)| rows.len() > 1).collect();

    println!("\n=== Exact duplicates across all fields ===");
    if exact.is_empty() {
        println!("No exact duplicates found.");
    } else {
        println!("{} exact duplicates found:", exact.len());
        for (_, rows) in exact.iter().take(5) {
            println!("  - {}: {} records", rows[0].full_address, rows.len());
        }
    }

    Ok(())
}

/// Buckets rows by an arbitrary key, preserving first-seen order.
fn group_rows<'a, K, I, F>(rows: I, key_of: F) -> Vec<(K, Vec<&'a StoredBoundary>)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a StoredBoundary>,
    F: Fn(&StoredBoundary) -> K,
{
    let mut index: AHashMap<K, usize> = AHashMap::new();
    let mut groups: Vec<(K, Vec<&StoredBoundary>)> = Vec::new();

    for row in rows {
        let key = key_of(row);
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }

    groups
}

fn joined<F>(rows: &[&StoredBoundary], pick: F) -> String
where
    F: Fn(&StoredBoundary) -> Option<&str>,
{
    rows.iter()
        .copied()
        .map(|r| pick(r).unwrap_or("null"))
        .collect::<Vec<_>>()
        .join(", ")
}
