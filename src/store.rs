//! The edge-processing state tracker.
//!
//! One row per registered input image, held in an in-memory SQLite table for
//! the process lifetime. Numeric series are persisted as comma-separated
//! text and deserialized on read.

use crate::error::{MtfError, MtfResult};
use crate::types::{display_name, EdgeRecord, EdgeStatus};
use rusqlite::{params, Connection};
use tracing::warn;

const CREATE_TABLE: &str = "CREATE TABLE edges (
    path         TEXT,
    name         TEXT,
    manufacturer TEXT,
    mode         TEXT,
    orientation  TEXT,
    frequency    TEXT,
    left         TEXT,
    right        TEXT,
    top          TEXT,
    bottom       TEXT,
    processed    INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (path, name)
)";

/// Serialize a numeric series to its stored text form.
pub fn serialize_series(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a stored series back into numbers. NaN round-trips.
pub fn deserialize_series(text: &str) -> MtfResult<Vec<f64>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| MtfError::Series(part.to_string()))
        })
        .collect()
}

/// In-process relational store of edge records, keyed by path.
pub struct EdgeStore {
    conn: Connection,
}

impl EdgeStore {
    /// Memory-only store; contents last for the process lifetime.
    pub fn new() -> MtfResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(EdgeStore { conn })
    }

    /// Insert one unprocessed record per path. A path that is already
    /// registered creates no second row.
    pub fn add_files<I, P>(&self, paths: I) -> MtfResult<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO edges (path, name) VALUES (?1, ?2)")?;
        for path in paths {
            let path = path.as_ref();
            stmt.execute(params![path, display_name(path)])?;
        }
        Ok(())
    }

    /// Display names in insertion order.
    pub fn names(&self) -> MtfResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM edges ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    /// Remove the record with this display name. Returns whether a row
    /// was removed.
    pub fn delete_by_name(&self, name: &str) -> MtfResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM edges WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }

    pub fn delete_all(&self) -> MtfResult<()> {
        self.conn.execute("DELETE FROM edges", [])?;
        Ok(())
    }

    /// Paths of records still awaiting measurement, in insertion order.
    pub fn unprocessed_paths(&self) -> MtfResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path FROM edges WHERE processed = 0 ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut paths = Vec::new();
        for path in rows {
            paths.push(path?);
        }
        Ok(paths)
    }

    /// Atomically store a measurement result and flip the record to
    /// processed. A path with no matching record is a logged no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn update_result(
        &self,
        path: &str,
        manufacturer: &str,
        mode: &str,
        orientation: &str,
        frequency: &[f64],
        left: &[f64],
        right: &[f64],
        top: &[f64],
        bottom: &[f64],
    ) -> MtfResult<()> {
        let updated = self.conn.execute(
            "UPDATE edges SET
                manufacturer = ?2, mode = ?3, orientation = ?4,
                frequency = ?5, left = ?6, right = ?7, top = ?8, bottom = ?9,
                processed = 1
             WHERE path = ?1",
            params![
                path,
                manufacturer,
                mode,
                orientation,
                serialize_series(frequency),
                serialize_series(left),
                serialize_series(right),
                serialize_series(top),
                serialize_series(bottom),
            ],
        )?;
        if updated == 0 {
            warn!(path, "update_result for unknown path ignored");
        }
        Ok(())
    }

    /// All processed records, numeric series deserialized.
    pub fn processed_records(&self) -> MtfResult<Vec<EdgeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, name, manufacturer, mode, orientation,
                    frequency, left, right, top, bottom
             FROM edges WHERE processed = 1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (path, name, manufacturer, mode, orientation, f, l, r, t, b) = row?;
            records.push(EdgeRecord {
                path,
                name,
                manufacturer,
                mode,
                orientation,
                frequency: deserialize_series(&f)?,
                left: deserialize_series(&l)?,
                right: deserialize_series(&r)?,
                top: deserialize_series(&t)?,
                bottom: deserialize_series(&b)?,
                status: EdgeStatus::Processed,
            });
        }
        Ok(records)
    }
}
