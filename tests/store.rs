// SQLite store tests against a real on-disk database.

use bndimport::feature::FeatureCollection;
use bndimport::pacer::NoopPacer;
use bndimport::pipeline::{ImportConfig, run_import};
use bndimport::store::{BoundaryStore, SqliteStore};
use serde_json::json;

fn sample_collection() -> FeatureCollection {
    let square = json!([[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]);
    serde_json::from_value(json!({
        "type": "FeatureCollection",
        "features": [
            {
                "geometry": { "type": "Polygon", "coordinates": square },
                "properties": { "N03_001": "東京都", "N03_003": "A市", "N03_007": "13101" },
            },
            {
                "geometry": { "type": "MultiPolygon", "coordinates": [square, square] },
                "properties": { "N03_001": "東京都", "N03_003": "A市", "N03_007": "13101" },
            },
            {
                "geometry": { "type": "Polygon", "coordinates": square },
                "properties": { "N03_001": "北海道", "N03_003": "札幌市", "N03_007": "01101" },
            },
        ],
    }))
    .unwrap()
}

fn import_into(store: &mut SqliteStore) -> bndimport::RunResult {
    let config = ImportConfig::default();
    run_import(&sample_collection(), store, &NoopPacer, &NoopPacer, &config).unwrap()
}

#[test]
fn schema_has_the_columns_the_pipeline_needs() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("bounds.db")).unwrap();
    let columns = store.table_columns().unwrap();
    for required in ["prefecture_code", "full_address", "geojson", "properties", "is_merged", "original_count"] {
        assert!(columns.iter().any(|c| c == required), "missing column {required}");
    }
}

#[test]
fn inserted_records_round_trip_through_scan_and_key_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bounds.db");
    let mut store = SqliteStore::open(&path).unwrap();

    let result = import_into(&mut store);
    assert_eq!(result.inserted, 2);
    assert_eq!(result.merged, 1);

    let rows = store.scan().unwrap();
    assert_eq!(rows.len(), 2);
    let tokyo = rows.iter().find(|r| r.prefecture_name == "東京都").unwrap();
    assert!(tokyo.is_merged);
    assert_eq!(tokyo.full_address, "東京都A市");
    assert_eq!(tokyo.prefecture_code, "13");

    let keys = store.existing_keys().unwrap();
    assert_eq!(keys.len(), 2);

    // Reopen: data persists and a rerun inserts nothing.
    drop(store);
    let mut store = SqliteStore::open(&path).unwrap();
    let rerun = import_into(&mut store);
    assert_eq!(rerun.inserted, 0);
    assert_eq!(rerun.duplicate_skipped, 3);
}

#[test]
fn delete_prefecture_removes_only_that_prefecture() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::open(&dir.path().join("bounds.db")).unwrap();
    import_into(&mut store);

    let deleted = store.delete_prefecture("13").unwrap();
    assert_eq!(deleted, 1);

    let rows = store.scan().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prefecture_name, "北海道");

    // Deleting the same prefecture again is a no-op.
    assert_eq!(store.delete_prefecture("13").unwrap(), 0);
}
