//! Task: Settings reconciliation.
//!
//! Forces the run-mode key so the service starts without its interactive menu.

use crate::bootstrap::types::BootContext;
use crate::errors::BootResult;
use crate::pipeline::PipelineTask;
use crate::settings::reconcile_settings;

pub struct SettingsTask;

impl PipelineTask<BootContext> for SettingsTask {
    fn run(&self, ctx: &mut BootContext) -> BootResult<()> {
        let report = reconcile_settings(
            ctx.volume()?,
            &ctx.options.settings_file,
            &ctx.options.run_command,
        )?;
        ctx.settings = Some(report);
        Ok(())
    }

    fn name(&self) -> &str {
        "settings_reconcile"
    }
}
