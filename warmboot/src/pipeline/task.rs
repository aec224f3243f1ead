//! Task trait for pipeline execution.

use crate::errors::BootResult;

/// A step that can be executed in a pipeline.
///
/// Tasks receive the shared context mutably and record their output in it.
pub trait PipelineTask<Ctx> {
    /// Execute the task against the shared pipeline context.
    fn run(&self, ctx: &mut Ctx) -> BootResult<()>;

    /// Human-readable task name for logging and metrics.
    fn name(&self) -> &str;
}

pub type BoxedTask<Ctx> = Box<dyn PipelineTask<Ctx>>;
