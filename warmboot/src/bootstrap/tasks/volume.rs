//! Task: Volume setup.

use crate::bootstrap::types::BootContext;
use crate::errors::BootResult;
use crate::pipeline::PipelineTask;
use crate::volume::ensure_volume;

pub struct VolumeTask;

impl PipelineTask<BootContext> for VolumeTask {
    fn run(&self, ctx: &mut BootContext) -> BootResult<()> {
        let volume = ensure_volume(&ctx.options.volume_dir)?;
        ctx.volume = Some(volume);
        Ok(())
    }

    fn name(&self) -> &str {
        "volume_setup"
    }
}
