//! Table-driven sequential task pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ExecutionPlan → Tasks (run in order, stop at first error)
//! ```
//!
//! Tasks share a mutable context: each task reads the outputs of the tasks
//! before it and stores its own.
//!
//! ## Example
//!
//! ```ignore
//! use pipeline::{ExecutionPlan, PipelineExecutor};
//!
//! let plan = ExecutionPlan::new(vec![Box::new(TaskA), Box::new(TaskB)]);
//! let metrics = PipelineExecutor::execute(plan, &mut ctx)?;
//! println!("pipeline took {}ms", metrics.total_duration_ms);
//! ```

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod task;

pub use metrics::{PipelineMetrics, TaskMetrics};
pub use pipeline::{ExecutionPlan, PipelineExecutor};
pub use task::{BoxedTask, PipelineTask};
