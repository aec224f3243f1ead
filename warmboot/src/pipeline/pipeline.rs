//! Sequential pipeline executor.

use std::time::Instant;

use super::metrics::{PipelineMetrics, TaskMetrics};
use super::task::BoxedTask;
use crate::errors::BootResult;

/// Ordered list of tasks to run.
pub struct ExecutionPlan<Ctx> {
    tasks: Vec<BoxedTask<Ctx>>,
}

impl<Ctx> ExecutionPlan<Ctx> {
    pub fn new(tasks: Vec<BoxedTask<Ctx>>) -> Self {
        Self { tasks }
    }

    pub fn tasks(self) -> Vec<BoxedTask<Ctx>> {
        self.tasks
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }
}

pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Run every task in order against `ctx`.
    ///
    /// The first failing task aborts the pipeline; later tasks never run.
    pub fn execute<Ctx>(plan: ExecutionPlan<Ctx>, ctx: &mut Ctx) -> BootResult<PipelineMetrics> {
        let total_start = Instant::now();
        let mut task_metrics = Vec::new();

        for task in plan.tasks() {
            let name = task.name().to_string();
            tracing::debug!(task = %name, "Task started");

            let task_start = Instant::now();
            task.run(ctx)
                .inspect_err(|e| tracing::error!(task = %name, error = %e, "Task failed"))?;

            task_metrics.push(TaskMetrics {
                name,
                duration_ms: task_start.elapsed().as_millis(),
            });
        }

        Ok(PipelineMetrics {
            total_duration_ms: total_start.elapsed().as_millis(),
            tasks: task_metrics,
        })
    }
}
