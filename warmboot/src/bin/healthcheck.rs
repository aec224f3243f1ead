//! Container health check: exit 0 if the service answers 200, else 1.

use std::panic::{self, UnwindSafe};
use std::process::ExitCode;

use clap::Parser;
use warmboot::constants::probe;
use warmboot::logging::init_logging;
use warmboot::{ProbeOptions, ProbeVerdict, probe_blocking};

#[derive(Parser, Debug)]
#[command(
    name = "warmboot-healthcheck",
    about = "Probe the service health endpoint once"
)]
struct Args {
    /// Service port (falls back to the default when unparsable)
    #[arg(long, env = "PORT")]
    port: Option<String>,

    /// Timeout in seconds, fractions allowed (falls back to the default when unparsable)
    #[arg(long, env = "HEALTHCHECK_TIMEOUT")]
    timeout: Option<String>,

    #[arg(long, default_value = probe::HOST)]
    host: String,

    #[arg(long, default_value = probe::PATH)]
    path: String,
}

fn main() -> ExitCode {
    init_logging("warn");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return ExitCode::from(u8::from(e.use_stderr()));
        }
    };

    ExitCode::from(run(args, probe_blocking))
}

impl Args {
    fn probe_options(&self) -> ProbeOptions {
        ProbeOptions::from_raw(self.port.as_deref(), self.timeout.as_deref())
            .with_host(self.host.clone())
            .with_path(self.path.clone())
    }
}

/// Probe once and map the verdict to an exit code; a panic counts as unhealthy.
fn run<F>(args: Args, check: F) -> u8
where
    F: FnOnce(&ProbeOptions) -> ProbeVerdict + UnwindSafe,
{
    panic::catch_unwind(move || check(&args.probe_options()).exit_code()).unwrap_or(1)
}
