//! xrayctl - a client for the JIRA REST API and its Xray test management
//! extension.
//!
//! The library exposes [`XrayClient`], with one async method per remote
//! operation, and the CLI building blocks used by the `xrayctl` binary.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;

pub use api::{ApiError, XrayClient};
pub use config::{ConfigError, Properties};
pub use error::AppError;
