//! SQLite store for the service's toggles and options.
//!
//! Tables are created if absent and seeded with a fixed row set; see
//! [`seed`] for the per-row merge policy. Everything runs in one transaction
//! on one connection, which is closed before [`init_schema`] returns.

pub mod schema;
pub mod seed;

use std::path::Path;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

use crate::constants;
use crate::errors::{BootError, BootResult};
use crate::volume::VolumePath;

pub use schema::Table;
pub use seed::{SeedOutcome, SeedPolicy, SeedRow, SeedValue};

/// Helper macro to convert rusqlite errors to BootError.
macro_rules! db_err {
    ($result:expr) => {
        $result.map_err(|e| BootError::Database(e.to_string()))
    };
}

/// Per-row seeding results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub seeds: Vec<(&'static str, SeedOutcome)>,
}

impl SchemaReport {
    pub fn count(&self, outcome: SeedOutcome) -> usize {
        self.seeds.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn outcome(&self, name: &str) -> Option<SeedOutcome> {
        self.seeds
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, outcome)| *outcome)
    }
}

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file.
    pub fn open(db_path: &Path) -> BootResult<Self> {
        let conn = db_err!(Connection::open(db_path))?;

        // The service may open the same file right after handoff
        db_err!(conn.busy_timeout(Duration::from_secs(constants::db::BUSY_TIMEOUT_SECS)))?;

        Ok(Self { conn })
    }

    /// Create all tables and apply `seeds` in a single transaction.
    pub fn initialize(&mut self, seeds: &[SeedRow]) -> BootResult<SchemaReport> {
        let tx = db_err!(self.conn.transaction())?;

        for sql in schema::all_schemas() {
            db_err!(tx.execute_batch(sql))?;
        }

        let mut report = SchemaReport::default();
        for row in seeds {
            let previous: Option<Value> = db_err!(
                tx.query_row(&row.select_sql(), [row.name], |r| r.get(0))
                    .optional()
            )?;

            let changed = db_err!(tx.execute(
                &row.insert_sql(),
                rusqlite::params![row.name, row.value]
            ))?;

            let outcome = match (row.policy, previous) {
                (_, None) => SeedOutcome::Inserted,
                (SeedPolicy::DefaultIfAbsent, Some(_)) => SeedOutcome::Kept,
                (SeedPolicy::Forced, Some(prev)) if prev == row.value.to_value() => {
                    SeedOutcome::Unchanged
                }
                (SeedPolicy::Forced, Some(_)) => SeedOutcome::Overwritten,
            };

            tracing::debug!(
                table = row.table.name(),
                name = row.name,
                policy = ?row.policy,
                outcome = ?outcome,
                changed,
                "Seeded row"
            );
            report.seeds.push((row.name, outcome));
        }

        db_err!(tx.commit())?;
        Ok(report)
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> BootResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| BootError::Database(e.to_string()))
    }

    pub fn config_value(&self, name: &str) -> BootResult<Option<i64>> {
        db_err!(
            self.conn
                .query_row(
                    "SELECT VALUE FROM config_data WHERE NAME = ?1",
                    [name],
                    |row| row.get(0),
                )
                .optional()
        )
    }

    pub fn option_value(&self, name: &str) -> BootResult<Option<String>> {
        db_err!(
            self.conn
                .query_row(
                    "SELECT VALUE FROM option_data WHERE NAME = ?1",
                    [name],
                    |row| row.get(0),
                )
                .optional()
        )
    }

    pub fn row_count(&self, table: Table) -> BootResult<i64> {
        db_err!(self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        ))
    }

    pub fn table_exists(&self, table: Table) -> BootResult<bool> {
        let count: i64 = db_err!(self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table.name()],
            |row| row.get(0),
        ))?;
        Ok(count > 0)
    }

    /// Raw connection, for tests that simulate edits made by the service.
    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Open the store under `volume`, create tables, seed rows, and close.
pub fn init_schema(
    volume: &VolumePath,
    file_name: &str,
    locale: &str,
) -> BootResult<SchemaReport> {
    let path = volume.join(file_name);
    let mut db = Database::open(&path)?;
    let report = db.initialize(&seed::default_seeds(locale))?;
    db.close()?;

    tracing::info!(
        path = %path.display(),
        inserted = report.count(SeedOutcome::Inserted),
        kept = report.count(SeedOutcome::Kept),
        overwritten = report.count(SeedOutcome::Overwritten),
        "Database initialized"
    );

    Ok(report)
}
