//! API error types for the JIRA/Xray client.

use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when interacting with the JIRA and Xray APIs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status code.
    ///
    /// The response body is kept so callers can inspect server-supplied
    /// error details. A body that is not JSON is stored as a JSON string.
    #[error("{operation} failed with HTTP {status}{}", summarize(.body))]
    Status {
        operation: &'static str,
        status: StatusCode,
        body: Value,
    },

    /// Network, DNS, TLS or timeout failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response did not carry valid JSON.
    #[error("Invalid API response for {operation}: {source}")]
    ResponseParse {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A successful response lacked a field the client needs.
    #[error("{operation} response has no '{field}' field")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    /// A local file needed for the request could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation needs credentials but none are configured.
    #[error("{operation} requires a username and password in the properties file")]
    MissingCredentials { operation: &'static str },

    /// The request could not be built from the given arguments.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// The server response body, if this error carries one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The HTTP status code, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the failure is an authentication or permission problem.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ApiError::MissingCredentials { .. } => true,
            ApiError::Status { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }

    /// Error messages extracted from a JIRA error body.
    ///
    /// JIRA reports failures as `{"errorMessages": [...], "errors": {...}}`.
    pub fn server_messages(&self) -> Vec<String> {
        self.body().map(error_messages).unwrap_or_default()
    }
}

fn error_messages(body: &Value) -> Vec<String> {
    let mut messages: Vec<String> = body
        .get("errorMessages")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(errors) = body.get("errors").and_then(Value::as_object) {
        messages.extend(errors.iter().map(|(k, v)| match v.as_str() {
            Some(s) => format!("{}: {}", k, s),
            None => format!("{}: {}", k, v),
        }));
    }

    if messages.is_empty() {
        // Xray uses a single "error" field.
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            messages.push(error.to_string());
        }
    }

    messages
}

fn summarize(body: &Value) -> String {
    let messages = error_messages(body);
    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join(", "))
    }
}
