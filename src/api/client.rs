//! JIRA and Xray API client implementation.
//!
//! Each public method maps to exactly one HTTP round trip (except the
//! issue creation helpers, which first resolve the project id). Responses
//! are returned as untyped JSON. There is no retry, caching or pagination.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::query;
use super::types::{
    base_name, EvidenceAttachment, ExportSelector, IssueKind, IssuePayload, JunitImportOptions,
    TestExecutionImport, TestRunInfo,
};
use crate::config::{ClientSettings, Properties};

/// MIME type of a JUnit XML report upload.
const JUNIT_CONTENT_TYPE: &str = "application/xml";

/// Whether an operation may run without credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthPolicy {
    Required,
    Optional,
}

/// Static description of one remote operation.
#[derive(Debug, Clone, Copy)]
struct Operation {
    name: &'static str,
    expected: StatusCode,
    auth: AuthPolicy,
}

impl Operation {
    const fn read(name: &'static str) -> Self {
        Self {
            name,
            expected: StatusCode::OK,
            auth: AuthPolicy::Required,
        }
    }

    const fn create(name: &'static str) -> Self {
        Self {
            name,
            expected: StatusCode::CREATED,
            auth: AuthPolicy::Required,
        }
    }

    const fn anonymous(self) -> Self {
        Self {
            auth: AuthPolicy::Optional,
            ..self
        }
    }
}

const GET_PROJECT_INFO: Operation = Operation::read("get project info");
const GET_ISSUE_INFO: Operation = Operation::read("get issue info").anonymous();
const SAVE_TEST_RUN: Operation = Operation::create("save test run");
const GET_TEST_RUN_INFO: Operation = Operation::read("get test run info");
const CREATE_ISSUE: Operation = Operation::create("create issue");
const ADD_EVIDENCE: Operation = Operation::create("upload test run evidence");
const EXPORT_RESULTS: Operation = Operation::read("export results");
const IMPORT_JSON_RESULTS: Operation = Operation::read("import JSON results");
const IMPORT_JUNIT_RESULTS: Operation = Operation::read("import JUnit results");
const RUN_JQL_QUERY: Operation = Operation::read("run JQL query");

/// The JIRA/Xray API client.
///
/// Owns the loaded properties for its whole lifetime. Instances are
/// independent of each other and hold no mutable state.
#[derive(Debug)]
pub struct XrayClient {
    /// The HTTP client used for every call.
    client: Client,
    /// The HTTP client used for result imports.
    ///
    /// Only differs from `client` when `acceptInvalidCerts` is set.
    import_client: Client,
    /// The base URL of the JIRA instance, without a trailing slash.
    base_url: String,
    /// Credentials, if configured.
    auth: Option<Auth>,
}

impl XrayClient {
    /// Create a new client from loaded properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(skip(properties), fields(host = %properties.host))]
    pub fn new(properties: &Properties) -> Result<Self> {
        let settings = properties.client_settings();
        let client = Self::build_http_client(&settings, false)?;
        let import_client = if settings.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for result imports");
            Self::build_http_client(&settings, true)?
        } else {
            client.clone()
        };

        let auth = Auth::from_properties(properties);
        if auth.is_none() {
            info!("No credentials configured; only anonymous requests will succeed");
        }

        Ok(Self {
            client,
            import_client,
            base_url: normalize_base_url(&properties.host),
            auth,
        })
    }

    /// Build the HTTP client with explicit timeouts.
    fn build_http_client(settings: &ClientSettings, accept_invalid_certs: bool) -> Result<Client> {
        Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a project by key or id.
    ///
    /// Calls `GET /rest/api/2/project/{project}`.
    #[instrument(skip(self))]
    pub async fn get_project_info(&self, project: &str) -> Result<Value> {
        let url = self.url(&query::project_path(project));
        self.execute(GET_PROJECT_INFO, self.client.get(&url)).await
    }

    /// Resolve a project key to its numeric id.
    ///
    /// Numeric ids are returned in their string form.
    #[instrument(skip(self))]
    pub async fn get_project_id(&self, project_key: &str) -> Result<String> {
        let info = self.get_project_info(project_key).await?;
        let id = match info.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(ApiError::MissingField {
                    operation: GET_PROJECT_INFO.name,
                    field: "id",
                })
            }
        };

        debug!(project_id = %id, "Resolved project id");
        Ok(id)
    }

    /// Get an issue by key or id.
    ///
    /// Sent without credentials when none are configured.
    #[instrument(skip(self))]
    pub async fn get_issue_info(&self, issue: &str) -> Result<Value> {
        let url = self.url(&query::issue_path(issue));
        self.execute(GET_ISSUE_INFO, self.client.get(&url)).await
    }

    /// Save a single test run in the context of a test execution.
    #[instrument(skip(self, test_run_info), fields(test_key = %test_run_info.test_key))]
    pub async fn save_test_run(
        &self,
        test_execution_key: &str,
        test_run_info: TestRunInfo,
    ) -> Result<Value> {
        let url = self.url(&query::import_execution_path());
        let payload = TestExecutionImport {
            test_execution_key: test_execution_key.to_string(),
            tests: vec![test_run_info],
        };
        self.execute(SAVE_TEST_RUN, json_body(self.client.post(&url), &payload))
            .await
    }

    /// Get a test run by its test execution and test keys.
    #[instrument(skip(self))]
    pub async fn get_test_run_info(&self, test_execution_key: &str, test_key: &str) -> Result<Value> {
        let url = self.url(&query::test_run_path(test_execution_key, test_key));
        self.execute(GET_TEST_RUN_INFO, self.client.get(&url)).await
    }

    /// Create an issue from a prepared payload.
    #[instrument(skip(self, issue), fields(issue_type = %issue.fields.issuetype.name))]
    pub async fn create_issue(&self, issue: &IssuePayload) -> Result<Value> {
        let url = self.url(&query::create_issue_path());
        self.execute(CREATE_ISSUE, json_body(self.client.post(&url), issue))
            .await
    }

    /// Create an Xray issue of the given kind in a project.
    ///
    /// Resolves the project id first, then creates the issue.
    #[instrument(skip(self, summary, description))]
    pub async fn create_test_issue(
        &self,
        kind: IssueKind,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        let project_id = self.get_project_id(project_key).await?;
        let issue = IssuePayload::new(&project_id, summary, description, kind);
        self.create_issue(&issue).await
    }

    /// Create a manual Test issue.
    pub async fn create_manual_test(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_test_issue(IssueKind::Test, project_key, summary, description)
            .await
    }

    /// Create a Test Set issue.
    pub async fn create_test_set(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_test_issue(IssueKind::TestSet, project_key, summary, description)
            .await
    }

    /// Create a Test Plan issue.
    pub async fn create_test_plan(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_test_issue(IssueKind::TestPlan, project_key, summary, description)
            .await
    }

    /// Create a Test Execution issue.
    pub async fn create_test_execution(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_test_issue(IssueKind::TestExecution, project_key, summary, description)
            .await
    }

    /// Upload a file as evidence to a test run.
    ///
    /// The file is read whole and sent Base64 encoded in a JSON body.
    #[instrument(skip(self, evidence), fields(evidence = %evidence.display()))]
    pub async fn add_evidence_to_test_run(
        &self,
        test_run_id: &str,
        evidence: &Path,
        content_type: &str,
    ) -> Result<Value> {
        let attachment = EvidenceAttachment::from_file(evidence, content_type).await?;
        debug!(filename = %attachment.filename, "Prepared evidence attachment");

        let url = self.url(&query::evidence_path(test_run_id));
        self.execute(ADD_EVIDENCE, json_body(self.client.post(&url), &attachment))
            .await
    }

    /// Export test run results.
    #[instrument(skip(self))]
    pub async fn export_results(&self, selector: &ExportSelector) -> Result<Value> {
        let url = self.url(&query::export_path(selector));
        self.execute(EXPORT_RESULTS, self.client.get(&url)).await
    }

    /// Import results in the Xray JSON format.
    #[instrument(skip(self, results))]
    pub async fn import_json_results(&self, results: &Value) -> Result<Value> {
        let url = self.url(&query::import_execution_path());
        self.execute(
            IMPORT_JSON_RESULTS,
            json_body(self.import_client.post(&url), results),
        )
        .await
    }

    /// Import a JUnit XML report as a new test execution.
    ///
    /// The report is uploaded as the multipart field `file`.
    #[instrument(skip(self, options), fields(report = %report.display()))]
    pub async fn import_junit_results(
        &self,
        report: &Path,
        project_key: &str,
        options: &JunitImportOptions,
    ) -> Result<Value> {
        let contents = tokio::fs::read(report)
            .await
            .map_err(|source| ApiError::File {
                path: report.to_path_buf(),
                source,
            })?;

        let mut part_headers = header::HeaderMap::new();
        part_headers.insert(header::EXPIRES, header::HeaderValue::from_static("0"));
        let part = Part::bytes(contents)
            .file_name(base_name(report))
            .mime_str(JUNIT_CONTENT_TYPE)?
            .headers(part_headers);
        let form = Form::new().part("file", part);

        let url = self.url(&query::junit_import_path(project_key, options));
        self.execute(
            IMPORT_JUNIT_RESULTS,
            self.import_client.post(&url).multipart(form),
        )
        .await
    }

    /// Run a JQL search.
    #[instrument(skip(self))]
    pub async fn run_jql_query(&self, jql: &str) -> Result<Value> {
        let url = self.url(&query::search_path(jql));
        self.execute(RUN_JQL_QUERY, self.client.get(&url)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach credentials and send the request.
    async fn execute(&self, operation: Operation, request: RequestBuilder) -> Result<Value> {
        let request = match (&self.auth, operation.auth) {
            (Some(auth), _) => request.header(header::AUTHORIZATION, auth.header_value()),
            (None, AuthPolicy::Optional) => request,
            (None, AuthPolicy::Required) => {
                return Err(ApiError::MissingCredentials {
                    operation: operation.name,
                })
            }
        };

        let (client, request) = request.header(header::ACCEPT, "application/json").build_split();
        let request = request?;
        info!("{} {}", request.method(), request.url());

        let response = client.execute(request).await?;
        self.handle_response(operation, response).await
    }

    /// Check the status code and parse the JSON body.
    async fn handle_response(&self, operation: Operation, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Response body: {}", body);

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                operation = operation.name,
                "{}: Failed to {}",
                status.as_u16(),
                operation.name
            );
            let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
            return Err(ApiError::Status {
                operation: operation.name,
                status,
                body,
            });
        }

        if status != operation.expected {
            warn!(
                status = status.as_u16(),
                expected = operation.expected.as_u16(),
                operation = operation.name,
                "Unexpected success status"
            );
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|source| ApiError::ResponseParse {
            operation: operation.name,
            source,
        })
    }
}

/// Attach a JSON body with an explicit content type.
fn json_body<T: Serialize + ?Sized>(request: RequestBuilder, body: &T) -> RequestBuilder {
    request
        .header(header::CONTENT_TYPE, "application/json")
        .json(body)
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
