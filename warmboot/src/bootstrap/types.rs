//! Shared state for the bootstrap pipeline.

use crate::db::SchemaReport;
use crate::errors::{BootError, BootResult};
use crate::options::BootOptions;
use crate::settings::SettingsReport;
use crate::volume::VolumePath;

/// Options plus the output of every task that has run so far.
#[derive(Debug)]
pub struct BootContext {
    pub options: BootOptions,
    pub volume: Option<VolumePath>,
    pub settings: Option<SettingsReport>,
    pub schema: Option<SchemaReport>,
}

impl BootContext {
    pub fn new(options: BootOptions) -> Self {
        Self {
            options,
            volume: None,
            settings: None,
            schema: None,
        }
    }

    pub fn volume(&self) -> BootResult<&VolumePath> {
        self.volume
            .as_ref()
            .ok_or_else(|| BootError::Internal("volume task must run first".into()))
    }
}
