//! CLI configuration
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags:
//!
//! ```yaml
//! calculator:
//!   angle_mode: RAD
//!   seed: 42
//!   frame_interval_ms: 50
//! log_file: /tmp/pixelcalc.log
//! json_logs: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use pixelcalc::config::CalcConfig;
use pixelcalc::core::AngleMode;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings and errors
    #[default]
    Normal,
    /// Informational events
    Verbose,
    /// Engine debug events
    Debug,
    /// Every key dispatch
    Trace,
}

impl Verbosity {
    /// Level from the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug | Self::Trace)
    }

    /// Default `EnvFilter` directive when `PIXELCALC_LOG` is unset
    #[must_use]
    pub const fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "pixelcalc=debug,pixelcalc_cli=debug,info",
            Self::Trace => "pixelcalc=trace,pixelcalc_cli=trace,info",
        }
    }
}

/// Effective application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Power-on settings for both calculators
    pub calculator: CalcConfig,
    /// Log verbosity
    pub verbosity: Verbosity,
    /// Log destination; the TUI stays silent without one
    pub log_file: Option<PathBuf>,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl AppConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a YAML config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            CliError::config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_yaml(&text).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses YAML; missing keys take their defaults
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml_ng::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(text)
    }

    /// Renders the configuration as YAML
    pub fn to_yaml(&self) -> CliResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set random seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.calculator = self.calculator.with_seed(seed);
        self
    }

    /// Set power-on angle mode
    #[must_use]
    pub const fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.calculator = self.calculator.with_angle_mode(angle_mode);
        self
    }

    /// Set log file
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set JSON log output
    #[must_use]
    pub const fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Rejects settings the frontends cannot use
    pub fn validate(&self) -> CliResult<()> {
        if self.calculator.frame_interval_ms == 0 {
            return Err(CliError::config("frame_interval_ms must be positive"));
        }
        if self.calculator.matrix_cell_size == 0 {
            return Err(CliError::config("matrix_cell_size must be positive"));
        }
        Ok(())
    }
}
