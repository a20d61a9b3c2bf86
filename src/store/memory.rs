use anyhow::{Result, bail};

use crate::key::ExistingKeySet;
use crate::record::BoundaryRecord;

use super::{BoundaryStore, StoredBoundary};

/// In-memory store with the same surface as the SQLite store, plus
/// switches for failure injection. Used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub records: Vec<BoundaryRecord>,
    /// Fail every insert whose address contains this text.
    pub fail_inserts_matching: Option<String>,
    /// Fail the existing-key scan.
    pub fail_key_scan: bool,
}

impl BoundaryStore for MemoryStore {
    fn existing_keys(&mut self) -> Result<ExistingKeySet> {
        if self.fail_key_scan {
            bail!("key scan unavailable");
        }
        Ok(self.records.iter().map(|r| r.key()).collect())
    }

    fn insert(&mut self, record: &BoundaryRecord) -> Result<()> {
        if let Some(pattern) = &self.fail_inserts_matching {
            if record.full_address.contains(pattern.as_str()) {
                bail!("injected insert failure for {}", record.full_address);
            }
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn delete_prefecture(&mut self, prefecture_code: &str) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.prefecture_code != prefecture_code);
        Ok(before - self.records.len())
    }

    fn scan(&mut self) -> Result<Vec<StoredBoundary>> {
        Ok(self
            .records
            .iter()
            .map(|r| StoredBoundary {
                prefecture_code: r.prefecture_code.clone(),
                prefecture_name: r.prefecture_name.clone(),
                city_name: r.city_name.clone(),
                district_name: r.district_name.clone(),
                area_name: r.area_name.clone(),
                additional_code: Some(r.additional_code.clone()),
                full_address: r.full_address.clone(),
                is_merged: r.is_merged,
            })
            .collect())
    }
}
