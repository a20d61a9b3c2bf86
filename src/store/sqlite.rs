use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::key::{AdminKey, ExistingKeySet};
use crate::record::BoundaryRecord;

use super::{BoundaryStore, StoredBoundary};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS admin_boundaries (
    id INTEGER PRIMARY KEY,
    prefecture_code TEXT NOT NULL,
    prefecture_name TEXT NOT NULL,
    city_name TEXT,
    district_name TEXT,
    area_name TEXT,
    additional_code TEXT,
    full_address TEXT NOT NULL,
    geojson TEXT NOT NULL,
    properties TEXT NOT NULL,
    is_merged INTEGER NOT NULL DEFAULT 0,
    original_count INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_admin_boundaries_is_merged
    ON admin_boundaries(is_merged);
";

/// SQLite-backed boundary store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open boundary store at {}", path.display()))?;
        conn.execute_batch(SCHEMA)
            .context("Failed to ensure boundary schema")?;
        Ok(Self { conn })
    }

    /// Column names of the boundaries table, for the schema check.
    pub fn table_columns(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(admin_boundaries)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

impl BoundaryStore for SqliteStore {
    fn existing_keys(&mut self) -> Result<ExistingKeySet> {
        let mut stmt = self.conn.prepare(
            "SELECT prefecture_name, city_name, district_name FROM admin_boundaries",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AdminKey::new(row.get::<_, String>(0)?, row.get(1)?, row.get(2)?))
        })?;

        let mut keys = ExistingKeySet::default();
        for key in rows {
            keys.insert(key?);
        }
        Ok(keys)
    }

    fn insert(&mut self, record: &BoundaryRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO admin_boundaries (
                    prefecture_code, prefecture_name, city_name, district_name,
                    area_name, additional_code, full_address, geojson, properties,
                    is_merged, original_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.prefecture_code,
                    record.prefecture_name,
                    record.city_name,
                    record.district_name,
                    record.area_name,
                    record.additional_code,
                    record.full_address,
                    record.geometry_json().to_string(),
                    record.properties_json().to_string(),
                    record.is_merged,
                    record.original_count as i64,
                ],
            )
            .with_context(|| format!("Failed to insert {}", record.full_address))?;
        Ok(())
    }

    fn delete_prefecture(&mut self, prefecture_code: &str) -> Result<usize> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM admin_boundaries WHERE prefecture_code = ?1",
                params![prefecture_code],
            )
            .with_context(|| format!("Failed to delete prefecture {prefecture_code}"))?;
        Ok(deleted)
    }

    fn scan(&mut self) -> Result<Vec<StoredBoundary>> {
        let mut stmt = self.conn.prepare(
            "SELECT prefecture_code, prefecture_name, city_name, district_name,
                    area_name, additional_code, full_address, is_merged
             FROM admin_boundaries",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredBoundary {
                prefecture_code: row.get(0)?,
                prefecture_name: row.get(1)?,
                city_name: row.get(2)?,
                district_name: row.get(3)?,
                area_name: row.get(4)?,
                additional_code: row.get(5)?,
                full_address: row.get(6)?,
                is_merged: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
