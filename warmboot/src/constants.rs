//! Fixed defaults for the container layout.
//!
//! Components never read these directly; they receive them through
//! [`BootOptions`](crate::options::BootOptions) and
//! [`ProbeOptions`](crate::options::ProbeOptions).

/// Durable storage layout
pub mod paths {
    /// Volume root mounted into the container
    pub const VOLUME_DIR: &str = "/app/Volume";
}

/// Artifact file names inside the volume
pub mod filenames {
    pub const SETTINGS: &str = "settings.json";
    pub const DATABASE: &str = "DouK-Downloader.db";
}

/// Values forced on every boot
pub mod forced {
    /// `run_command` sentinel selecting non-interactive Web API mode
    pub const RUN_COMMAND: &str = "7";

    /// Locale preset written to the option table
    pub const LOCALE: &str = "zh_CN";
}

/// Service process started after bootstrap
pub mod service {
    pub const PROGRAM: &str = "python";
    pub const ARGS: &[&str] = &["api_main.py"];
}

/// Health probe defaults
pub mod probe {
    pub const HOST: &str = "localhost";
    pub const PORT: u16 = 5555;
    pub const PATH: &str = "/health";
    pub const TIMEOUT_SECS: f64 = 2.0;
}

/// SQLite tuning
pub mod db {
    /// Wait this long on a locked database before failing
    pub const BUSY_TIMEOUT_SECS: u64 = 30;
}
