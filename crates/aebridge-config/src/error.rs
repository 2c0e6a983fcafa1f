//! Configuration error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    ReadError {
        /// The file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A config file (or the merged tree) is not valid TOML for [`BridgeConfig`](crate::BridgeConfig).
    #[error("cannot parse config {}: {source}", path.display())]
    ParseError {
        /// The file, or a `<...>` marker for in-memory sources.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range or malformed.
    #[error("invalid value for '{field}': {message}")]
    ValidationError {
        /// Dotted field path, or a file path for size limits.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// An `AEBRIDGE_*` variable could not be applied.
    #[error("environment variable '{var_name}': {message}")]
    EnvError {
        /// The variable.
        var_name: String,
        /// What is wrong.
        message: String,
    },

    /// No home directory to look for the user config in.
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
