//! Seed rows and their merge policies.
//!
//! The classification below is fixed per row. Toggles a user may have
//! changed are only seeded when absent; rows that pin the container's
//! non-interactive mode are rewritten on every boot.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value};

use super::schema::Table;

pub const RECORDING_ENABLED: &str = "recording-enabled-default";
pub const VERBOSE_LOGGING: &str = "verbose-logging-default";
pub const CONSENT_ACCEPTED: &str = "consent-accepted";
pub const LOCALE: &str = "locale";

/// How a seed row merges with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Insert only if no row with the name exists.
    DefaultIfAbsent,
    /// Insert or overwrite unconditionally.
    Forced,
}

impl SeedPolicy {
    fn conflict_clause(self) -> &'static str {
        match self {
            SeedPolicy::DefaultIfAbsent => "IGNORE",
            SeedPolicy::Forced => "REPLACE",
        }
    }
}

/// Seeded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedValue {
    /// Stored as INTEGER 0/1 in `config_data`.
    Flag(bool),
    /// Stored as TEXT in `option_data`.
    Text(String),
}

impl SeedValue {
    pub(crate) fn to_value(&self) -> Value {
        match self {
            SeedValue::Flag(flag) => Value::Integer(i64::from(*flag)),
            SeedValue::Text(text) => Value::Text(text.clone()),
        }
    }
}

impl ToSql for SeedValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SeedValue::Flag(flag) => ToSqlOutput::from(i64::from(*flag)),
            SeedValue::Text(text) => ToSqlOutput::from(text.as_str()),
        })
    }
}

/// One `(NAME, VALUE)` row in a config or option table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRow {
    pub table: Table,
    pub name: &'static str,
    pub value: SeedValue,
    pub policy: SeedPolicy,
}

impl SeedRow {
    pub(crate) fn insert_sql(&self) -> String {
        format!(
            "INSERT OR {} INTO {} (NAME, VALUE) VALUES (?1, ?2)",
            self.policy.conflict_clause(),
            self.table.name()
        )
    }

    pub(crate) fn select_sql(&self) -> String {
        format!("SELECT VALUE FROM {} WHERE NAME = ?1", self.table.name())
    }
}

/// What happened to a seed row during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Row was absent and has been inserted.
    Inserted,
    /// Default row already existed and was left alone.
    Kept,
    /// Forced row existed with a different value and was overwritten.
    Overwritten,
    /// Forced row already held the forced value.
    Unchanged,
}

/// Rows seeded on every boot.
pub fn default_seeds(locale: &str) -> Vec<SeedRow> {
    vec![
        SeedRow {
            table: Table::ConfigData,
            name: RECORDING_ENABLED,
            value: SeedValue::Flag(true),
            policy: SeedPolicy::DefaultIfAbsent,
        },
        SeedRow {
            table: Table::ConfigData,
            name: VERBOSE_LOGGING,
            value: SeedValue::Flag(false),
            policy: SeedPolicy::DefaultIfAbsent,
        },
        SeedRow {
            table: Table::ConfigData,
            name: CONSENT_ACCEPTED,
            value: SeedValue::Flag(true),
            policy: SeedPolicy::Forced,
        },
        SeedRow {
            table: Table::OptionData,
            name: LOCALE,
            value: SeedValue::Text(locale.to_string()),
            policy: SeedPolicy::Forced,
        },
    ]
}
