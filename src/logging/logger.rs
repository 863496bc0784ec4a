// file: src/logging/logger.rs
// version: 1.0.0
// guid: e5f6a7b8-c9d0-4123-4567-89ef01234567

//! Logger initialization: stdout plus one append-only file per run

use crate::Result;
use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system with both stdout and file output.
///
/// Each invocation gets its own log file named by the start timestamp,
/// e.g. `logs/postinstall_20260830_141503.log`. The file is append-only
/// and never read back by the agent.
pub fn init_logger(log_dir: &Path, verbose: bool, quiet: bool) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    let now = chrono::Local::now();
    let log_path = log_dir.join(format!("postinstall_{}.log", now.format("%Y%m%d_%H%M%S")));

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_writer(io::stdout)
        .compact()
        .with_filter(level_filter(verbose, quiet));

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false) // No ANSI colors in log files
        .with_writer(file)
        .with_filter(level_filter(verbose, quiet));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| {
            crate::error::ProvisionError::config(format!("Failed to initialize logger: {}", e))
        })?;

    tracing::info!("Logging initialized - writing to stdout and {}", log_path.display());

    Ok(())
}

fn level_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_logger_creates_log_dir_and_file() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("logs");

        // The subscriber can only be installed once per process, so a
        // second initialization in the same test binary may fail; the
        // directory must exist either way.
        let _ = init_logger(&log_dir, false, false);

        assert!(log_dir.exists());
    }
}
