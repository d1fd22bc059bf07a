//! Error types for the registry and configuration store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for configuration store operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("configuration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("malformed configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error on configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur when mutating the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no endpoint at index {index} (registry holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("endpoint url must not be empty")]
    EmptyUrl,
}
