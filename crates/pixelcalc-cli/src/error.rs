//! Error types for the CLI

use std::path::PathBuf;

use pixelcalc::core::CalcError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Config file could not be parsed
    #[error("Invalid config file {}: {source}", path.display())]
    ConfigFile {
        /// File that failed to parse
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Calculator error
    #[error("Calculator error: {0}")]
    Calc(#[from] CalcError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Logging could not be installed
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a logging error
    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad seed");
        assert_eq!(err.to_string(), "Configuration error: bad seed");
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("no keys");
        assert!(err.to_string().contains("no keys"));
    }

    #[test]
    fn test_from_calc_error() {
        let err: CliError = CalcError::unknown_operation("frob").into();
        assert!(matches!(err, CliError::Calc(_)));
        assert!(err.to_string().contains("frob"));
    }

    #[test]
    fn test_from_io_error() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_config_file_error_names_path() {
        let source = serde_yaml_ng::from_str::<u8>("[").unwrap_err();
        let err = CliError::ConfigFile {
            path: PathBuf::from("calc.yaml"),
            source,
        };
        assert!(err.to_string().contains("calc.yaml"));
    }
}
