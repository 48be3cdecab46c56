//! Authentication handling for the JIRA and Xray APIs.
//!
//! Both APIs use HTTP Basic Auth with the username and password from the
//! properties file.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::Properties;

/// Basic auth credentials.
#[derive(Clone)]
pub struct Auth {
    /// The user name.
    username: String,
    /// The Base64-encoded authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create credentials from a username and password.
    ///
    /// The password is immediately encoded and the raw value is not stored.
    pub fn new(username: &str, password: &str) -> Self {
        let auth_header = build_auth_header(username, password);
        Self {
            username: username.to_string(),
            auth_header,
        }
    }

    /// Credentials from the properties file, if both username and password are set.
    pub fn from_properties(properties: &Properties) -> Option<Self> {
        properties
            .credentials()
            .map(|(username, password)| Self::new(username, password))
    }

    /// Get the authorization header value for HTTP requests.
    ///
    /// Returns the complete "Basic ..." header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the user name.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "username:password" in Base64 and prepends "Basic ".
fn build_auth_header(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("test_user", "test_token");
        assert_eq!(header, "Basic dGVzdF91c2VyOnRlc3RfdG9rZW4=");
    }

    #[test]
    fn test_auth_header_round_trips() {
        let auth = Auth::new("bot", "p@ss:word");
        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "bot:p@ss:word");
        assert_eq!(auth.username(), "bot");
    }

    #[test]
    fn test_from_properties() {
        let props = Properties::new("https://jira.example.com");
        assert!(Auth::from_properties(&props).is_none());

        let props = props.with_credentials("bot", "secret");
        let auth = Auth::from_properties(&props).unwrap();
        assert_eq!(auth.username(), "bot");
    }

    #[test]
    fn test_auth_does_not_expose_password() {
        let auth = Auth::new("bot", "secret_token");
        let debug_output = format!("{:?}", auth);

        assert!(!debug_output.contains("secret_token"));
        assert!(!debug_output.contains(auth.header_value()));
    }
}
