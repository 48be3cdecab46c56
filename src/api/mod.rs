//! JIRA and Xray API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST
//! API (`/rest/api/2`) and the Xray test management API (`/rest/raven/1.0`).

mod auth;
mod client;
pub mod error;
pub mod query;
pub mod types;

pub use auth::Auth;
pub use client::XrayClient;
pub use error::ApiError;
pub use types::{
    EvidenceAttachment, ExportOptions, ExportSelector, IssueKind, IssuePayload, JunitImportOptions,
    TestExecutionImport, TestRunInfo,
};
