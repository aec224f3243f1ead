//! Container start sequence.
//!
//! ## Architecture
//!
//! ```text
//!   1. VolumeTask     (ensure volume root exists and is writable)
//!   2. SettingsTask   (load-or-create settings, force run_command)
//!   3. SchemaTask     (create tables, seed default/forced rows)
//!   4. handoff        (exec the service; never returns on success)
//! ```
//!
//! Steps communicate only through the filesystem, so re-running the whole
//! sequence after a crash at any point is safe.

mod tasks;
mod types;

use std::convert::Infallible;

use crate::db::SchemaReport;
use crate::errors::{BootError, BootResult};
use crate::handoff::handoff;
use crate::options::BootOptions;
use crate::pipeline::{BoxedTask, ExecutionPlan, PipelineExecutor, PipelineMetrics};
use crate::settings::SettingsReport;
use crate::volume::VolumePath;

pub use types::BootContext;

use tasks::{SchemaTask, SettingsTask, VolumeTask};

fn get_execution_plan() -> ExecutionPlan<BootContext> {
    let tasks: Vec<BoxedTask<BootContext>> = vec![
        Box::new(VolumeTask),
        Box::new(SettingsTask),
        Box::new(SchemaTask),
    ];
    ExecutionPlan::new(tasks)
}

/// Everything the preparation steps produced.
#[derive(Debug)]
pub struct BootReport {
    pub volume: VolumePath,
    pub settings: SettingsReport,
    pub schema: SchemaReport,
    pub metrics: PipelineMetrics,
}

/// Prepare durable state without handing off.
pub fn prepare(options: BootOptions) -> BootResult<BootReport> {
    options.sanitize()?;

    tracing::info!(volume = %options.volume_dir.display(), "Preparing service state");

    let mut ctx = BootContext::new(options);
    let metrics = PipelineExecutor::execute(get_execution_plan(), &mut ctx)?;
    metrics.log();

    let BootContext {
        volume,
        settings,
        schema,
        ..
    } = ctx;

    Ok(BootReport {
        volume: volume.ok_or_else(|| BootError::Internal("volume task did not run".into()))?,
        settings: settings
            .ok_or_else(|| BootError::Internal("settings task did not run".into()))?,
        schema: schema.ok_or_else(|| BootError::Internal("schema task did not run".into()))?,
        metrics,
    })
}

/// Prepare state, then replace this process with the service.
///
/// Returns only if preparation or the exec fails.
pub fn run(options: BootOptions) -> BootResult<Infallible> {
    let target = options.handoff.clone();
    prepare(options)?;
    Err(handoff(&target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::HandoffTarget;
    use crate::pipeline::PipelineTask;
    use tempfile::TempDir;

    #[test]
    fn test_plan_order() {
        let plan = get_execution_plan();
        assert_eq!(
            plan.task_names(),
            vec!["volume_setup", "settings_reconcile", "schema_init"]
        );
    }

    #[test]
    fn test_prepare_fresh_volume() {
        let temp_dir = TempDir::new().unwrap();
        let options = BootOptions::with_volume(temp_dir.path().join("Volume"));

        let report = prepare(options.clone()).unwrap();

        assert_eq!(report.volume.as_path(), options.volume_dir.as_path());
        assert_eq!(report.settings.path, options.settings_path());
        assert!(options.database_path().is_file());
        assert_eq!(
            report.metrics.task_names(),
            vec!["volume_setup", "settings_reconcile", "schema_init"]
        );
    }

    #[test]
    fn test_invalid_options_abort_before_touching_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = BootOptions::with_volume(temp_dir.path().join("Volume"));
        options.settings_file = "nested/settings.json".into();

        assert!(matches!(prepare(options), Err(BootError::Config(_))));
        assert!(!temp_dir.path().join("Volume").exists());
    }

    #[test]
    fn test_settings_task_requires_volume() {
        let mut ctx = BootContext::new(BootOptions::default());
        let err = tasks::SettingsTask.run(&mut ctx).unwrap_err();
        assert!(matches!(err, BootError::Internal(_)));
    }

    #[test]
    fn test_run_reports_handoff_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = BootOptions::with_volume(temp_dir.path());
        options.handoff = HandoffTarget::new("/nonexistent/warmboot-service-binary");

        let err = run(options.clone()).unwrap_err();

        assert!(matches!(err, BootError::Handoff(_)));
        // State is prepared before the exec is attempted
        assert!(options.settings_path().is_file());
        assert!(options.database_path().is_file());
    }
}
