//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Config file {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("Invalid config: {0}")]
    Decode(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("Cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    /// A response ceiling is zero
    #[error("Invalid limit {name}: must be at least 1")]
    InvalidLimit {
        /// Name of the ceiling
        name: &'static str,
    },

    /// An environment override could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Environment variable
        key: String,
        /// Raw value
        value: String,
    },

    /// No platform config directory could be determined
    #[error("No config directory available on this platform")]
    NoConfigDir,
}
