use anyhow::Result;

use crate::key::{AdminKey, ExistingKeySet};
use crate::record::BoundaryRecord;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Row shape returned by full-table scans, used by the audit commands.
#[derive(Debug, Clone)]
pub struct StoredBoundary {
    pub prefecture_code: String,
    pub prefecture_name: String,
    pub city_name: Option<String>,
    pub district_name: Option<String>,
    pub area_name: Option<String>,
    pub additional_code: Option<String>,
    pub full_address: String,
    pub is_merged: bool,
}

impl StoredBoundary {
    pub fn key(&self) -> AdminKey {
        AdminKey::new(
            self.prefecture_name.clone(),
            self.city_name.clone(),
            self.district_name.clone(),
        )
    }
}

/// Narrow persistence surface used by the pipeline: key scan, single
/// insert, per-prefecture delete, full scan for auditing. The store has
/// a practical per-write payload ceiling and exposes no transactions to
/// the pipeline.
pub trait BoundaryStore {
    /// All persisted (prefecture, city, district) key triples.
    fn existing_keys(&mut self) -> Result<ExistingKeySet>;

    /// Persists one finalized record.
    fn insert(&mut self, record: &BoundaryRecord) -> Result<()>;

    /// Removes every record for one 2-digit prefecture code, returning
    /// the number of rows deleted.
    fn delete_prefecture(&mut self, prefecture_code: &str) -> Result<usize>;

    /// Every persisted row, for duplicate auditing.
    fn scan(&mut self) -> Result<Vec<StoredBoundary>>;
}
