//! Error types for the bootstrap and probe paths.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type BootResult<T> = Result<T, BootError>;

/// Fatal failures that abort the boot sequence.
///
/// Lenient-recovery cases (corrupt settings, bad timeout values) never
/// surface here; they are handled where they occur.
#[derive(Debug, Error)]
pub enum BootError {
    /// Volume directory could not be created or is unusable.
    #[error("storage error: {0}")]
    Storage(String),

    /// Settings document could not be read or persisted.
    #[error("settings error: {0}")]
    Settings(String),

    /// Any SQLite failure while opening, creating tables, or seeding.
    #[error("database error: {0}")]
    Database(String),

    /// Invalid boot options.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Service program could not be executed.
    #[error("handoff failed: {0}")]
    Handoff(String),

    /// Pipeline wiring bug (a task ran before its input was produced).
    #[error("internal error: {0}")]
    Internal(String),
}
