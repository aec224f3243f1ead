//! End-to-end bootstrap behavior against a temporary volume.

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use serde_json::{Value, json};
use tempfile::TempDir;
use warmboot::db::seed::{CONSENT_ACCEPTED, LOCALE, RECORDING_ENABLED, VERBOSE_LOGGING};
use warmboot::db::{Database, SeedOutcome, Table};
use warmboot::settings::{ParseRecovery, SettingsSource};
use warmboot::{BootOptions, prepare};

fn options(temp_dir: &TempDir) -> BootOptions {
    BootOptions::with_volume(temp_dir.path().join("Volume"))
}

fn read_settings(options: &BootOptions) -> Value {
    serde_json::from_str(&fs::read_to_string(options.settings_path()).unwrap()).unwrap()
}

fn open_db(options: &BootOptions) -> Database {
    Database::open(&options.database_path()).unwrap()
}

fn execute(path: &Path, sql: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

fn dump(options: &BootOptions) -> Vec<(String, String, String)> {
    let conn = Connection::open(options.database_path()).unwrap();
    let mut rows = Vec::new();
    for table in ["config_data", "option_data"] {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT NAME, CAST(VALUE AS TEXT) FROM {} ORDER BY NAME",
                table
            ))
            .unwrap();
        let iter = stmt
            .query_map([], |row| {
                Ok((table.to_string(), row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .unwrap();
        rows.extend(iter.map(Result::unwrap));
    }
    rows
}

#[test]
fn fresh_volume_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);

    let report = prepare(options.clone()).unwrap();

    assert_eq!(report.settings.source, SettingsSource::Missing);
    assert_eq!(read_settings(&options), json!({ "run_command": "7" }));

    let db = open_db(&options);
    assert_eq!(db.config_value(CONSENT_ACCEPTED).unwrap(), Some(1));
    assert_eq!(db.config_value(RECORDING_ENABLED).unwrap(), Some(1));
    assert_eq!(db.config_value(VERBOSE_LOGGING).unwrap(), Some(0));
    assert_eq!(db.option_value(LOCALE).unwrap().as_deref(), Some("zh_CN"));
    assert_eq!(db.row_count(Table::OptionData).unwrap(), 1);
    assert_eq!(db.row_count(Table::DownloadData).unwrap(), 0);
    assert_eq!(db.row_count(Table::MappingData).unwrap(), 0);

    let mut names: Vec<_> = fs::read_dir(&options.volume_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["DouK-Downloader.db", "settings.json"]);
}

#[test]
fn repeated_boots_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);

    prepare(options.clone()).unwrap();
    let settings_once = read_settings(&options);
    let rows_once = dump(&options);

    for _ in 0..3 {
        let report = prepare(options.clone()).unwrap();
        assert_eq!(report.settings.source, SettingsSource::Loaded);
        assert_eq!(report.schema.count(SeedOutcome::Inserted), 0);
        assert_eq!(report.schema.count(SeedOutcome::Overwritten), 0);
    }

    assert_eq!(read_settings(&options), settings_once);
    assert_eq!(dump(&options), rows_once);
}

#[test]
fn user_settings_survive_and_run_command_is_forced() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);
    fs::create_dir_all(&options.volume_dir).unwrap();
    fs::write(
        options.settings_path(),
        r#"{"foo": "bar", "run_command": "", "max_retry": 5}"#,
    )
    .unwrap();

    let report = prepare(options.clone()).unwrap();

    assert_eq!(report.settings.previous_run_command, Some(json!("")));
    assert_eq!(
        read_settings(&options),
        json!({ "foo": "bar", "run_command": "7", "max_retry": 5 })
    );
}

#[test]
fn corrupt_settings_do_not_abort_boot() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);
    fs::create_dir_all(&options.volume_dir).unwrap();
    fs::write(options.settings_path(), "{\"foo\": ").unwrap();

    let report = prepare(options.clone()).unwrap();

    assert!(matches!(
        report.settings.source,
        SettingsSource::Recovered(ParseRecovery::InvalidJson(_))
    ));
    assert_eq!(read_settings(&options)["run_command"], json!("7"));
}

#[test]
fn user_toggles_survive_and_forced_rows_are_reset() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);
    prepare(options.clone()).unwrap();

    execute(
        &options.database_path(),
        "UPDATE config_data SET VALUE = 0 WHERE NAME = 'recording-enabled-default';
         UPDATE config_data SET VALUE = 1 WHERE NAME = 'verbose-logging-default';
         UPDATE config_data SET VALUE = 0 WHERE NAME = 'consent-accepted';
         UPDATE option_data SET VALUE = 'en_US' WHERE NAME = 'locale';",
    );

    prepare(options.clone()).unwrap();

    let db = open_db(&options);
    assert_eq!(db.config_value(RECORDING_ENABLED).unwrap(), Some(0));
    assert_eq!(db.config_value(VERBOSE_LOGGING).unwrap(), Some(1));
    assert_eq!(db.config_value(CONSENT_ACCEPTED).unwrap(), Some(1));
    assert_eq!(db.option_value(LOCALE).unwrap().as_deref(), Some("zh_CN"));
}

#[test]
fn externally_pre_seeded_default_is_not_reverted() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);
    fs::create_dir_all(&options.volume_dir).unwrap();
    execute(
        &options.database_path(),
        "CREATE TABLE config_data (
            NAME TEXT PRIMARY KEY,
            VALUE INTEGER NOT NULL CHECK(VALUE IN (0, 1))
         );
         INSERT INTO config_data (NAME, VALUE) VALUES ('recording-enabled-default', 0);",
    );

    let report = prepare(options.clone()).unwrap();

    assert_eq!(report.schema.outcome(RECORDING_ENABLED), Some(SeedOutcome::Kept));
    assert_eq!(open_db(&options).config_value(RECORDING_ENABLED).unwrap(), Some(0));
}
