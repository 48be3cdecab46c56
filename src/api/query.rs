//! URL paths and query strings for the JIRA and Xray endpoints.
//!
//! Every caller-supplied value is percent-encoded (RFC 3986) before it is
//! placed in a path segment or query string.

use urlencoding::encode;

use super::types::{ExportSelector, JunitImportOptions};

/// Path prefix of the JIRA REST API.
pub const JIRA_REST_API: &str = "/rest/api/2";

/// Path prefix of the Xray REST API.
pub const XRAY_REST_API: &str = "/rest/raven/1.0";

/// `GET` a project by key or id.
pub fn project_path(project: &str) -> String {
    format!("{}/project/{}", JIRA_REST_API, encode(project))
}

/// `GET` an issue by key or id.
pub fn issue_path(issue: &str) -> String {
    format!("{}/issue/{}", JIRA_REST_API, encode(issue))
}

/// `POST` a new issue.
pub fn create_issue_path() -> String {
    format!("{}/issue", JIRA_REST_API)
}

/// `GET` issues matching a JQL query.
pub fn search_path(jql: &str) -> String {
    format!("{}/search?jql={}", JIRA_REST_API, encode(jql))
}

/// `POST` Xray JSON execution results.
pub fn import_execution_path() -> String {
    format!("{}/import/execution", XRAY_REST_API)
}

/// `GET` a test run by test execution and test keys.
pub fn test_run_path(test_execution_key: &str, test_key: &str) -> String {
    format!(
        "{}/api/testrun?testExecIssueKey={}&testIssueKey={}",
        XRAY_REST_API,
        encode(test_execution_key),
        encode(test_key)
    )
}

/// `POST` an evidence attachment to a test run.
pub fn evidence_path(test_run_id: &str) -> String {
    format!("{}/api/testrun/{}/attachment", XRAY_REST_API, encode(test_run_id))
}

/// `GET` exported test runs.
pub fn export_path(selector: &ExportSelector) -> String {
    format!("{}/testruns?{}", XRAY_REST_API, export_query(selector))
}

/// The query string selecting which test runs to export.
pub fn export_query(selector: &ExportSelector) -> String {
    match selector {
        ExportSelector::TestRun {
            test_execution_key,
            test_key,
        } => format!(
            "testExecKey={}&testKey={}",
            encode(test_execution_key),
            encode(test_key)
        ),
        ExportSelector::TestPlan(key) => format!("testPlanKey={}", encode(key)),
        ExportSelector::TestExecution(key) => format!("testExecKey={}", encode(key)),
        ExportSelector::SavedFilter(id) => format!("savedFilterId={}", encode(id)),
    }
}

/// `POST` a JUnit XML report.
pub fn junit_import_path(project_key: &str, options: &JunitImportOptions) -> String {
    format!(
        "{}/import/execution/junit?{}",
        XRAY_REST_API,
        junit_import_query(project_key, options)
    )
}

/// The query string of a JUnit import. Unset and empty modifiers are skipped.
pub fn junit_import_query(project_key: &str, options: &JunitImportOptions) -> String {
    let mut query = format!("projectKey={}", encode(project_key));

    let modifiers = [
        ("testPlanKey", &options.test_plan_key),
        ("testEnvironments", &options.test_environments),
        ("revision", &options.revision),
        ("fixVersion", &options.fix_version),
    ];
    for (name, value) in modifiers {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            query.push('&');
            query.push_str(name);
            query.push('=');
            query.push_str(&encode(value));
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_encodes_jql() {
        let path = search_path("status = Open");
        assert_eq!(path, "/rest/api/2/search?jql=status%20%3D%20Open");

        let value = path.split_once("jql=").unwrap().1;
        assert!(!value.contains(' '));
        assert!(!value.contains('='));
        assert!(value.contains("%3D%20Open"));
    }

    #[test]
    fn test_search_path_encodes_reserved_characters() {
        let path = search_path("project = CALC AND labels in (a&b)");
        assert!(path.ends_with("project%20%3D%20CALC%20AND%20labels%20in%20%28a%26b%29"));
    }

    #[test]
    fn test_search_path_keeps_whitespace_runs() {
        // Whitespace is encoded per character, not collapsed.
        assert_eq!(
            search_path("status  =\tOpen"),
            "/rest/api/2/search?jql=status%20%20%3D%09Open"
        );
    }

    #[test]
    fn test_export_query_test_run() {
        let selector = ExportSelector::TestRun {
            test_execution_key: "EXEC-1".to_string(),
            test_key: "T-1".to_string(),
        };
        assert_eq!(export_query(&selector), "testExecKey=EXEC-1&testKey=T-1");
        assert_eq!(
            export_path(&selector),
            "/rest/raven/1.0/testruns?testExecKey=EXEC-1&testKey=T-1"
        );
    }

    #[test]
    fn test_export_query_other_selectors() {
        assert_eq!(
            export_query(&ExportSelector::SavedFilter("42".to_string())),
            "savedFilterId=42"
        );
        assert_eq!(
            export_query(&ExportSelector::TestPlan("PLAN-1".to_string())),
            "testPlanKey=PLAN-1"
        );
        assert_eq!(
            export_query(&ExportSelector::TestExecution("EXEC-1".to_string())),
            "testExecKey=EXEC-1"
        );
    }

    #[test]
    fn test_junit_query_project_only() {
        let query = junit_import_query("CALC", &JunitImportOptions::default());
        assert_eq!(query, "projectKey=CALC");
    }

    #[test]
    fn test_junit_query_skips_empty_modifiers() {
        let options = JunitImportOptions {
            test_plan_key: Some("CALC-100".to_string()),
            test_environments: Some(String::new()),
            revision: None,
            fix_version: Some("1.0".to_string()),
        };
        assert_eq!(
            junit_import_query("CALC", &options),
            "projectKey=CALC&testPlanKey=CALC-100&fixVersion=1.0"
        );
    }

    #[test]
    fn test_junit_query_all_modifiers() {
        let options = JunitImportOptions {
            test_plan_key: Some("CALC-100".to_string()),
            test_environments: Some("chrome;linux".to_string()),
            revision: Some("abc123".to_string()),
            fix_version: Some("v1.0 beta".to_string()),
        };
        assert_eq!(
            junit_import_path("CALC", &options),
            "/rest/raven/1.0/import/execution/junit?projectKey=CALC&testPlanKey=CALC-100\
             &testEnvironments=chrome%3Blinux&revision=abc123&fixVersion=v1.0%20beta"
        );
    }

    #[test]
    fn test_test_run_path() {
        assert_eq!(
            test_run_path("CALC-10", "CALC-1"),
            "/rest/raven/1.0/api/testrun?testExecIssueKey=CALC-10&testIssueKey=CALC-1"
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(project_path("MY PROJ"), "/rest/api/2/project/MY%20PROJ");
        assert_eq!(issue_path("CALC-1"), "/rest/api/2/issue/CALC-1");
        assert_eq!(evidence_path("123"), "/rest/raven/1.0/api/testrun/123/attachment");
    }
}
