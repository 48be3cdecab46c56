//! JIRA and Xray request payload types.
//!
//! Responses are handled as untyped `serde_json::Value`s; only the request
//! bodies this crate builds are modelled here.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// The Xray issue types that can be created through this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// A manual test.
    Test,
    /// A set of tests.
    TestSet,
    /// A test plan.
    TestPlan,
    /// A test execution.
    TestExecution,
}

impl IssueKind {
    /// The JIRA issue type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Test => "Test",
            IssueKind::TestSet => "Test Set",
            IssueKind::TestPlan => "Test Plan",
            IssueKind::TestExecution => "Test Execution",
        }
    }

    /// All creatable kinds.
    pub fn all() -> &'static [IssueKind] {
        &[
            IssueKind::Test,
            IssueKind::TestSet,
            IssueKind::TestPlan,
            IssueKind::TestExecution,
        ]
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `POST /rest/api/2/issue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub fields: IssuePayloadFields,
}

/// Fields of a new issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayloadFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    pub issuetype: IssueTypeRef,
}

/// Reference to a project by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

/// Reference to an issue type by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTypeRef {
    pub name: String,
}

impl IssuePayload {
    /// Build the payload for a new issue of `kind` in the given project.
    pub fn new(project_id: &str, summary: &str, description: &str, kind: IssueKind) -> Self {
        Self {
            fields: IssuePayloadFields {
                project: ProjectRef {
                    id: project_id.to_string(),
                },
                summary: summary.to_string(),
                description: description.to_string(),
                issuetype: IssueTypeRef {
                    name: kind.as_str().to_string(),
                },
            },
        }
    }
}

/// The result of running one test, as imported into a Test Execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunInfo {
    /// The test issue key.
    pub test_key: String,
    /// Start date of the test run.
    pub start: String,
    /// Finish date of the test run.
    pub finish: String,
    /// Run status, e.g. `PASS` or `FAIL`.
    pub status: String,
    /// Free-form comment.
    pub comment: String,
}

impl TestRunInfo {
    /// Build test run info ready for import.
    pub fn new(
        test_key: impl Into<String>,
        start: impl Into<String>,
        finish: impl Into<String>,
        status: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            test_key: test_key.into(),
            start: start.into(),
            finish: finish.into(),
            status: status.into(),
            comment: comment.into(),
        }
    }
}

/// Body of `POST /rest/raven/1.0/import/execution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecutionImport {
    pub test_execution_key: String,
    pub tests: Vec<TestRunInfo>,
}

/// A file attached as evidence to a test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceAttachment {
    /// Base64 encoded file contents.
    pub data: String,
    /// The file's base name.
    pub filename: String,
    /// MIME type of the file.
    pub content_type: String,
}

impl EvidenceAttachment {
    /// Build an attachment from raw bytes.
    pub fn from_bytes(bytes: &[u8], filename: &str, content_type: &str) -> Self {
        Self {
            data: BASE64.encode(bytes),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        }
    }

    /// Read a file and build an attachment from its contents.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::File` if the file cannot be read.
    pub async fn from_file(path: &Path, content_type: &str) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::File {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_bytes(&bytes, &base_name(path), content_type))
    }
}

/// Which test runs to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSelector {
    /// A single test inside a test execution.
    TestRun {
        test_execution_key: String,
        test_key: String,
    },
    /// All runs of a test plan.
    TestPlan(String),
    /// All runs of a test execution.
    TestExecution(String),
    /// The runs matched by a saved JIRA filter.
    SavedFilter(String),
}

/// Loose export options, resolved into an `ExportSelector`.
///
/// Precedence when several fields are set:
/// 1. `test_execution_key` together with `test_key`
/// 2. `test_execution_key`
/// 3. `test_plan_key`
/// 4. `saved_filter_id`
///
/// Lower-ranked fields are ignored once a higher-ranked selection applies.
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub test_execution_key: Option<String>,
    pub test_key: Option<String>,
    pub test_plan_key: Option<String>,
    pub saved_filter_id: Option<String>,
}

impl ExportOptions {
    /// Resolve the options into a single selector.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if no selector field is set.
    pub fn selector(&self) -> Result<ExportSelector> {
        let exec = non_empty(&self.test_execution_key);
        let test = non_empty(&self.test_key);

        if let (Some(exec), Some(test)) = (exec, test) {
            return Ok(ExportSelector::TestRun {
                test_execution_key: exec.to_string(),
                test_key: test.to_string(),
            });
        }
        if let Some(exec) = exec {
            return Ok(ExportSelector::TestExecution(exec.to_string()));
        }
        if let Some(plan) = non_empty(&self.test_plan_key) {
            return Ok(ExportSelector::TestPlan(plan.to_string()));
        }
        if let Some(filter) = non_empty(&self.saved_filter_id) {
            return Ok(ExportSelector::SavedFilter(filter.to_string()));
        }

        Err(ApiError::InvalidRequest(
            "export needs a test execution key, test plan key or saved filter id".to_string(),
        ))
    }
}

/// Optional modifiers for a JUnit import. Empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunitImportOptions {
    pub test_plan_key: Option<String>,
    pub test_environments: Option<String>,
    pub revision: Option<String>,
    pub fix_version: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The final path component as a string, or the whole path if there is none.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
