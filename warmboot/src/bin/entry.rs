//! Container entrypoint: prepare the volume, then exec the service.

use std::path::PathBuf;

use clap::Parser;
use warmboot::constants::paths;
use warmboot::logging::init_logging;
use warmboot::{BootOptions, bootstrap};

#[derive(Parser, Debug)]
#[command(
    name = "warmboot-entry",
    about = "Prepare persistent service state and hand off to the service"
)]
struct Args {
    /// Volume root holding the settings document and database
    #[arg(long, env = "WARMBOOT_VOLUME", default_value = paths::VOLUME_DIR)]
    volume: PathBuf,

    /// Prepare state and exit instead of starting the service
    #[arg(long)]
    prepare_only: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging("info");
    let args = Args::parse();

    let options = BootOptions::with_volume(args.volume);

    if args.prepare_only {
        bootstrap::prepare(options)?;
        return Ok(());
    }

    match bootstrap::run(options) {
        Ok(never) => match never {},
        Err(e) => {
            tracing::error!(error = %e, "Boot failed");
            Err(e.into())
        }
    }
}
