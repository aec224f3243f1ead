//! Durable storage root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{BootError, BootResult};

/// A volume directory known to exist and accept writes.
///
/// Only [`ensure_volume`] constructs one, so holding a `VolumePath` is proof
/// that the first boot step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumePath(PathBuf);

impl VolumePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Path of an artifact stored directly under the volume.
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.0.join(file_name)
    }
}

impl fmt::Display for VolumePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Create the volume directory (and missing ancestors) if needed.
///
/// Fails when the path is occupied by a non-directory or is not writable.
pub fn ensure_volume(dir: &Path) -> BootResult<VolumePath> {
    let existed = dir.is_dir();

    std::fs::create_dir_all(dir).map_err(|e| {
        BootError::Storage(format!(
            "Failed to create volume at {}: {}",
            dir.display(),
            e
        ))
    })?;

    if !dir.is_dir() {
        return Err(BootError::Storage(format!(
            "Volume path {} is not a directory",
            dir.display()
        )));
    }

    // Anonymous file, unlinked on drop
    tempfile::tempfile_in(dir).map_err(|e| {
        BootError::Storage(format!(
            "Volume at {} is not writable: {}",
            dir.display(),
            e
        ))
    })?;

    if existed {
        tracing::debug!(volume = %dir.display(), "Volume already present");
    } else {
        tracing::info!(volume = %dir.display(), "Created volume");
    }

    Ok(VolumePath(dir.to_path_buf()))
}
