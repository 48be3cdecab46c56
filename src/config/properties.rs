//! The JSON properties file describing a JIRA/Xray deployment.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClientSettings, ConfigError, Result};

/// Deployment properties loaded from a JSON file.
///
/// ```json
/// { "host": "https://jira.example.com", "username": "bot", "password": "secret" }
/// ```
///
/// Keys this crate does not know about are preserved in `extra`.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    /// Base URL of the JIRA instance.
    pub host: String,

    /// Basic auth user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password or API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Connect timeout override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    /// Disable certificate verification for the import endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_invalid_certs: Option<bool>,

    /// Any other deployment properties.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Properties {
    /// Create properties for a host with no credentials.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: None,
            timeout_secs: None,
            connect_timeout_secs: None,
            accept_invalid_certs: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach basic auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Load and validate properties from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read, is not valid JSON,
    /// or fails validation (for example when `host` is missing).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading properties");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let properties = Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        Ok(properties)
    }

    /// Parse and validate properties from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let properties: Self = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: Default::default(),
            source,
        })?;
        properties.validate()?;
        Ok(properties)
    }

    /// Validate these properties.
    ///
    /// Checks that:
    /// - The host is non-empty and uses http:// or https://
    /// - Username and password are either both set or both absent
    /// - Timeouts, when given, are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("host cannot be empty".to_string()));
        }

        if !self.host.starts_with("https://") && !self.host.starts_with("http://") {
            return Err(ConfigError::Validation(format!(
                "host '{}' must start with http:// or https://",
                self.host
            )));
        }

        match (&self.username, &self.password) {
            (Some(_), None) => {
                return Err(ConfigError::Validation(
                    "username is set but password is missing".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Validation(
                    "password is set but username is missing".to_string(),
                ))
            }
            _ => {}
        }

        if self.timeout_secs == Some(0) || self.connect_timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured credentials, if both username and password are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    /// Derive the HTTP client settings.
    pub fn client_settings(&self) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            accept_invalid_certs: self.accept_invalid_certs.unwrap_or(false),
        }
    }
}

impl std::fmt::Debug for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Properties")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("extra", &self.extra)
            .finish()
    }
}
