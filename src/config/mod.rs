//! Configuration management for xrayctl.
//!
//! This module loads the JSON properties file that describes the JIRA
//! instance (host and credentials) and derives the HTTP client settings
//! from it.

mod properties;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use properties::Properties;
pub use settings::ClientSettings;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The properties file could not be read.
    #[error("failed to read properties file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The properties file is not valid JSON or has the wrong shape.
    #[error("failed to parse properties file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The properties were parsed but are not usable.
    #[error("invalid properties: {0}")]
    Validation(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
