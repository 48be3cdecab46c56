//! Centralized error types for xrayctl.
//!
//! This module aggregates the library errors into one application error
//! with user-facing messages and process exit codes.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    /// The command completed.
    pub const SUCCESS: u8 = 0;
    /// An unexpected local failure (I/O, terminal).
    pub const FAILURE: u8 = 1;
    /// Unknown command or unusable input.
    pub const INPUT: u8 = 2;
    /// The properties file is missing or invalid.
    pub const CONFIG: u8 = 3;
    /// Authentication or permission failure.
    pub const AUTH: u8 = 4;
    /// The server rejected the request.
    pub const API: u8 = 5;
    /// The server could not be reached.
    pub const TRANSPORT: u8 = 6;
    /// The server answered with something that is not JSON.
    pub const RESPONSE: u8 = 7;
}

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (stdout, file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Interactive prompt failures.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Unknown command or invalid user input.
    #[error("{0}")]
    Input(String),
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Prompt(err.to_string())
    }
}

impl AppError {
    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        AppError::Input(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::Read { .. } => format!(
                    "Could not read the properties file. Please check the path exists and is readable. ({})",
                    e
                ),
                ConfigError::Parse { .. } => format!(
                    "The properties file is not valid. It must be a JSON object with at least a \"host\" key. ({})",
                    e
                ),
                ConfigError::Validation(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Status { status, .. } if e.is_auth_failure() => {
                    format!("Authentication failed (HTTP {}). Please check your username and password.", status.as_u16())
                }
                ApiError::MissingCredentials { .. } => e.to_string(),
                ApiError::Transport(_) => {
                    format!("Could not connect to JIRA: {}", e)
                }
                _ => e.to_string(),
            },
            AppError::Io(_) | AppError::Prompt(_) | AppError::Input(_) => self.to_string(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(_) => {
                Some("Create a JSON file like {\"host\": \"https://jira.example.com\", \"username\": \"...\", \"password\": \"...\"}.")
            }
            AppError::Api(ApiError::MissingCredentials { .. }) => {
                Some("Add \"username\" and \"password\" to the properties file.")
            }
            AppError::Api(e) if e.is_auth_failure() => {
                Some("Verify the credentials in the properties file and your JIRA permissions.")
            }
            AppError::Api(ApiError::Transport(_)) => {
                Some("Check the \"host\" value in the properties file and your network connection.")
            }
            AppError::Input(_) => Some("Available commands: junit, json, jql, issue, project, export."),
            _ => None,
        }
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => exit_code::CONFIG,
            AppError::Api(ApiError::MissingCredentials { .. }) => exit_code::AUTH,
            AppError::Api(e @ ApiError::Status { .. }) if e.is_auth_failure() => exit_code::AUTH,
            AppError::Api(ApiError::Status { .. }) => exit_code::API,
            AppError::Api(ApiError::Transport(_)) => exit_code::TRANSPORT,
            AppError::Api(ApiError::ResponseParse { .. } | ApiError::MissingField { .. }) => {
                exit_code::RESPONSE
            }
            AppError::Api(ApiError::InvalidRequest(_)) | AppError::Input(_) => exit_code::INPUT,
            AppError::Api(ApiError::File { .. }) | AppError::Io(_) | AppError::Prompt(_) => {
                exit_code::FAILURE
            }
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    fn status_error(status: StatusCode) -> AppError {
        AppError::Api(ApiError::Status {
            operation: "import JUnit results",
            status,
            body: json!({"error": "boom"}),
        })
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::Validation("host cannot be empty".to_string());
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::Validation(_))));
        assert_eq!(app_err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::InvalidRequest("no selector".to_string()).into();
        assert!(matches!(app_err, AppError::Api(ApiError::InvalidRequest(_))));
        assert_eq!(app_err.exit_code(), exit_code::INPUT);
    }

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED).exit_code(), exit_code::AUTH);
        assert_eq!(status_error(StatusCode::FORBIDDEN).exit_code(), exit_code::AUTH);
        assert_eq!(status_error(StatusCode::BAD_REQUEST).exit_code(), exit_code::API);
        assert_eq!(
            AppError::Api(ApiError::MissingCredentials { operation: "run JQL query" }).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(AppError::input("unknown command 'foo'").exit_code(), exit_code::INPUT);
        assert_ne!(exit_code::CONFIG, exit_code::SUCCESS);
    }

    #[test]
    fn test_missing_credentials_is_auth_not_local_failure() {
        let err = AppError::Api(ApiError::MissingCredentials { operation: "export results" });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = AppError::Api(ApiError::File {
            path: std::path::PathBuf::from("/nonexistent/report.xml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(err.exit_code(), exit_code::FAILURE);
        assert_eq!(AppError::Prompt("closed".to_string()).exit_code(), exit_code::FAILURE);
    }

    #[test]
    fn test_user_message_auth_failure() {
        let msg = status_error(StatusCode::UNAUTHORIZED).user_message();
        assert!(msg.contains("Authentication failed"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn test_user_message_status_includes_server_detail() {
        let msg = status_error(StatusCode::BAD_REQUEST).user_message();
        assert!(msg.contains("import JUnit results"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::Validation("host cannot be empty".to_string()));
        assert_eq!(err.user_message(), "Configuration error: host cannot be empty");
    }

    #[test]
    fn test_suggested_action() {
        let err = AppError::Config(ConfigError::Validation("x".to_string()));
        assert!(err.suggested_action().unwrap().contains("host"));

        let err = AppError::input("unknown command 'foo'");
        assert!(err.suggested_action().unwrap().contains("junit"));

        let err = AppError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"));
        assert!(err.suggested_action().is_none());
    }
}
