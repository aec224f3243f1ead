//! Process handoff to the long-running service.

use std::ffi::OsStr;
use std::process::Command;

use crate::errors::BootError;

/// Fixed command line of the service process.
///
/// The bootstrap's own arguments are never forwarded; the environment
/// (including `PORT`) is inherited as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffTarget {
    pub program: String,
    pub args: Vec<String>,
}

impl HandoffTarget {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(OsStr::new(&self.program));
        cmd.args(&self.args);
        cmd
    }
}

/// Replace the current process with the service.
///
/// Only returns on failure. On Unix the process image is replaced via
/// `exec`, so no bootstrap process remains. Elsewhere the service runs as a
/// child and this process exits with the child's status.
pub fn handoff(target: &HandoffTarget) -> BootError {
    tracing::info!(
        program = %target.program,
        args = ?target.args,
        "Handing off to service process"
    );

    exec(target)
}

#[cfg(unix)]
fn exec(target: &HandoffTarget) -> BootError {
    use std::os::unix::process::CommandExt;

    let err = target.command().exec();
    tracing::error!(program = %target.program, error = %err, "Failed to exec service");
    BootError::Handoff(format!("Failed to exec {}: {}", target.program, err))
}

#[cfg(not(unix))]
fn exec(target: &HandoffTarget) -> BootError {
    match target.command().status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => {
            tracing::error!(program = %target.program, error = %err, "Failed to spawn service");
            BootError::Handoff(format!("Failed to spawn {}: {}", target.program, err))
        }
    }
}
