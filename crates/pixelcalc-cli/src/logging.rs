//! tracing subscriber setup
//!
//! `PIXELCALC_LOG` takes an `EnvFilter` directive and wins over the
//! verbosity flags. Headless commands log to stderr. The TUI owns the
//! terminal, so it logs only to a file and stays silent without one.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "PIXELCALC_LOG";

/// Where a command's logs can go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Log file if configured, otherwise stderr
    Stderr,
    /// Log file if configured, otherwise nothing
    FileOnly,
}

/// Builds the filter from the environment or the configured verbosity
#[must_use]
pub fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(config.verbosity.filter()))
}

/// Installs the global subscriber
///
/// Returns false when nothing was installed.
pub fn init(config: &AppConfig, target: LogTarget) -> CliResult<bool> {
    let (writer, ansi) = match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| {
                    CliError::logging(format!("cannot open {}: {err}", path.display()))
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, LogTarget::Stderr) => (BoxMakeWriter::new(std::io::stderr), true),
        (None, LogTarget::FileOnly) => return Ok(false),
    };

    let registry = tracing_subscriber::registry().with(env_filter(config));
    let result = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_target(false)
                    .with_writer(writer),
            )
            .try_init()
    };
    result.map_err(|err| CliError::logging(err.to_string()))?;
    Ok(true)
}
