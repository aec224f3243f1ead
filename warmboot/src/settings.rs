//! Settings document reconciliation.
//!
//! The document is a JSON object owned by the service. On every boot the
//! `run_command` key is forced to the non-interactive sentinel; every other
//! key passes through untouched. A missing, corrupt, or non-object document
//! is treated as empty rather than failing the boot.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::errors::{BootError, BootResult};
use crate::volume::VolumePath;

/// Key forced on every reconciliation.
pub const RUN_COMMAND_KEY: &str = "run_command";

/// Why a previous document was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRecovery {
    /// File contents were not valid JSON (includes empty and non-UTF-8 files).
    InvalidJson(String),
    /// Valid JSON, but not an object. Holds the JSON type that was found.
    NotAnObject(&'static str),
}

/// Where the reconciled document started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Existing object, all keys carried over.
    Loaded,
    /// No file yet.
    Missing,
    /// File existed but was unusable; started from an empty object.
    Recovered(ParseRecovery),
}

/// Outcome of [`reconcile_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsReport {
    pub path: PathBuf,
    pub source: SettingsSource,
    /// `run_command` value before it was forced, if one existed.
    pub previous_run_command: Option<Value>,
    /// Number of keys written.
    pub key_count: usize,
}

impl SettingsReport {
    pub fn recovered(&self) -> bool {
        matches!(self.source, SettingsSource::Recovered(_))
    }
}

/// Load-or-create the settings document and force `run_command`.
pub fn reconcile_settings(
    volume: &VolumePath,
    file_name: &str,
    run_command: &str,
) -> BootResult<SettingsReport> {
    let path = volume.join(file_name);
    let (mut document, source) = load_document(&path)?;

    match &source {
        SettingsSource::Loaded => {
            tracing::debug!(path = %path.display(), keys = document.len(), "Loaded settings")
        }
        SettingsSource::Missing => {
            tracing::info!(path = %path.display(), "No settings found, creating")
        }
        SettingsSource::Recovered(reason) => tracing::warn!(
            path = %path.display(),
            reason = ?reason,
            "Discarding unreadable settings, starting from empty document"
        ),
    }

    let previous_run_command =
        document.insert(RUN_COMMAND_KEY.to_string(), Value::String(run_command.to_string()));

    write_document(&path, &document)?;

    tracing::info!(
        path = %path.display(),
        run_command = %run_command,
        "Settings reconciled"
    );

    Ok(SettingsReport {
        path,
        source,
        previous_run_command,
        key_count: document.len(),
    })
}

/// Read the current document, classifying anything unusable.
///
/// Only I/O failures other than "not found" are errors.
fn load_document(path: &Path) -> BootResult<(Map<String, Value>, SettingsSource)> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok((Map::new(), SettingsSource::Missing));
        }
        Err(e) => {
            return Err(BootError::Settings(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    Ok(match parse_document(&bytes) {
        Ok(document) => (document, SettingsSource::Loaded),
        Err(recovery) => (Map::new(), SettingsSource::Recovered(recovery)),
    })
}

fn parse_document(bytes: &[u8]) -> Result<Map<String, Value>, ParseRecovery> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(ParseRecovery::NotAnObject(json_kind(&other))),
        Err(e) => Err(ParseRecovery::InvalidJson(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Replace the document via temp file + rename next to the real file.
///
/// A symlinked settings path is written through, not replaced. When the
/// rename cannot work (single-file bind mount, link into another
/// filesystem) the file is truncated and rewritten in place.
fn write_document(path: &Path, document: &Map<String, Value>) -> BootResult<()> {
    let settings_err = |e: std::io::Error| {
        BootError::Settings(format!("Failed to write {}: {}", path.display(), e))
    };

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(|e| BootError::Settings(format!("Failed to serialize settings: {}", e)))?;
    buf.push(b'\n');

    let target = resolve_link(path).map_err(settings_err)?;
    let dir = target.parent().ok_or_else(|| {
        BootError::Settings(format!("Settings path {} has no parent", target.display()))
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(settings_err)?;
    tmp.write_all(&buf).map_err(settings_err)?;
    tmp.as_file().sync_all().map_err(settings_err)?;
    preserve_permissions(&target, tmp.as_file()).map_err(settings_err)?;

    match tmp.persist(&target) {
        Ok(_) => Ok(()),
        Err(e) if is_rename_blocked(&e.error) => {
            tracing::debug!(
                path = %target.display(),
                error = %e.error,
                "Rename over settings blocked, rewriting in place"
            );
            drop(e.file);
            write_in_place(&target, &buf).map_err(settings_err)
        }
        Err(e) => Err(settings_err(e.error)),
    }
}

/// Follow a symlinked settings path to the file it names.
///
/// Dangling links resolve to their target so the write creates it.
fn resolve_link(path: &Path) -> std::io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(resolved) => Ok(resolved),
            Err(_) => {
                let link = fs::read_link(path)?;
                Ok(match path.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                })
            }
        },
        _ => Ok(path.to_path_buf()),
    }
}

fn is_rename_blocked(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ResourceBusy | ErrorKind::CrossesDevices
    )
}

fn write_in_place(path: &Path, buf: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(buf)?;
    file.sync_all()
}

/// Keep the previous file's mode; new files get 0644 instead of the temp file's 0600.
#[cfg(unix)]
fn preserve_permissions(path: &Path, file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta.permissions(),
        _ => fs::Permissions::from_mode(0o644),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn preserve_permissions(_path: &Path, _file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
