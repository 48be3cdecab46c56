//! HTTP client settings derived from the properties file.

use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings used to build the underlying HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Total time allowed for a single request.
    pub timeout: Duration,
    /// Time allowed for establishing the connection.
    pub connect_timeout: Duration,
    /// Skip TLS certificate verification on the result import endpoints.
    ///
    /// Off unless the properties file explicitly sets `acceptInvalidCerts`.
    pub accept_invalid_certs: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            accept_invalid_certs: false,
        }
    }
}
