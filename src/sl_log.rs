// Tracing setup
// The terminal belongs to the UI, so log output goes to a file

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter
pub const LOG_ENV: &str = "SAOLEI_LOG";

fn open_log(dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("saolei.log"))
}

/// Install the global subscriber writing to `<dir>/saolei.log`, filtered by
/// `SAOLEI_LOG` (default `info`).
/// Logging is dropped silently when the file cannot be opened.
pub fn init(dir: &Path) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = open_log(dir) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
