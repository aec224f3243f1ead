//! Configuration for the bootstrap sequence and the health probe.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{filenames, forced, paths, probe, service};
use crate::errors::{BootError, BootResult};
use crate::handoff::HandoffTarget;

/// Everything the bootstrap needs, with container defaults.
///
/// Tests and alternative deployments point `volume_dir` elsewhere via
/// [`BootOptions::with_volume`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOptions {
    /// Durable storage root.
    pub volume_dir: PathBuf,
    /// Settings document name inside the volume.
    pub settings_file: String,
    /// SQLite database name inside the volume.
    pub database_file: String,
    /// Value forced into the settings `run_command` key.
    pub run_command: String,
    /// Value forced into the `locale` option row.
    pub locale: String,
    /// Service started once state is prepared.
    pub handoff: HandoffTarget,
}

impl Default for BootOptions {
    fn default() -> Self {
        Self {
            volume_dir: PathBuf::from(paths::VOLUME_DIR),
            settings_file: filenames::SETTINGS.to_string(),
            database_file: filenames::DATABASE.to_string(),
            run_command: forced::RUN_COMMAND.to_string(),
            locale: forced::LOCALE.to_string(),
            handoff: HandoffTarget::new(service::PROGRAM).args(service::ARGS.iter().copied()),
        }
    }
}

impl BootOptions {
    /// Default options rooted at `volume_dir`.
    pub fn with_volume(volume_dir: impl Into<PathBuf>) -> Self {
        Self {
            volume_dir: volume_dir.into(),
            ..Self::default()
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.volume_dir.join(&self.settings_file)
    }

    pub fn database_path(&self) -> PathBuf {
        self.volume_dir.join(&self.database_file)
    }

    /// Reject options that could never produce a valid layout.
    pub fn sanitize(&self) -> BootResult<()> {
        if !self.volume_dir.is_absolute() {
            return Err(BootError::Config(format!(
                "volume_dir must be absolute path, got: {}",
                self.volume_dir.display()
            )));
        }

        for (field, name) in [
            ("settings_file", &self.settings_file),
            ("database_file", &self.database_file),
        ] {
            if !is_plain_file_name(name) {
                return Err(BootError::Config(format!(
                    "{} must be a bare file name, got: {:?}",
                    field, name
                )));
            }
        }

        if self.settings_file == self.database_file {
            return Err(BootError::Config(format!(
                "settings_file and database_file must differ, both are {:?}",
                self.settings_file
            )));
        }

        if self.handoff.program.is_empty() {
            return Err(BootError::Config("handoff program must not be empty".into()));
        }

        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

/// Target and bound for a single health probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOptions {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            host: probe::HOST.to_string(),
            port: probe::PORT,
            path: probe::PATH.to_string(),
            timeout: default_timeout(),
        }
    }
}

impl ProbeOptions {
    /// Build options from raw environment values.
    ///
    /// Missing or unparsable values fall back to defaults instead of failing.
    pub fn from_raw(port: Option<&str>, timeout: Option<&str>) -> Self {
        Self {
            port: parse_port(port),
            timeout: parse_timeout(timeout),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs_f64(probe::TIMEOUT_SECS)
}

/// Parse a port override, falling back to the default port.
pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return probe::PORT;
    };

    match raw.parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            tracing::warn!(value = %raw, default = probe::PORT, "Ignoring invalid port override");
            probe::PORT
        }
    }
}

/// Parse a timeout override in (possibly fractional) seconds.
///
/// Non-numeric, non-finite, zero and negative values fall back to the default.
pub fn parse_timeout(raw: Option<&str>) -> Duration {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default_timeout();
    };

    let parsed = raw
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

    match parsed {
        Some(timeout) => timeout,
        None => {
            tracing::warn!(
                value = %raw,
                default_secs = probe::TIMEOUT_SECS,
                "Ignoring invalid health check timeout"
            );
            default_timeout()
        }
    }
}
