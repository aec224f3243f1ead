//! Container bootstrap for a volume-backed service.
//!
//! `warmboot-entry` prepares durable state on every container start and then
//! execs the service; `warmboot-healthcheck` lets the orchestrator poll the
//! running service.
//!
//! ```text
//! volume::ensure_volume → settings::reconcile_settings → db::init_schema → handoff::handoff
//! ```

pub mod bootstrap;
pub mod constants;
pub mod db;
pub mod errors;
pub mod handoff;
pub mod health;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod settings;
pub mod volume;

pub use bootstrap::{BootReport, prepare, run};
pub use errors::{BootError, BootResult};
pub use health::{ProbeFailure, ProbeVerdict, probe, probe_blocking};
pub use options::{BootOptions, ProbeOptions};
