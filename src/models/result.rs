use chrono::NaiveDateTime;
use serde::Serialize;

use super::group::GroupedTestResults;
use super::status::TestStatus;

#[derive(Debug, Clone, Serialize)]
pub struct TestSuite {
    pub name: String,
    /// Declared count; not checked against `results.len()`.
    pub tests: usize,
    pub skipped: usize,
    pub failures: usize,
    pub errors: usize,
    pub timestamp: NaiveDateTime,
    pub hostname: String,
    /// Seconds.
    pub time: f64,
    pub results: Vec<TestResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub class_name: String,
    pub time: f64,
    pub passed: bool,
    /// Present iff `passed` is false.
    pub failure: Option<TestFailure>,
    pub output: Option<String>,
}

impl TestResult {
    pub fn status(&self) -> TestStatus {
        if self.passed {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestFailure {
    pub message: String,
    pub kind: String,
    pub content: String,
}

/// Normalized report produced once per completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub passed_tests: Vec<String>,
    pub failed_tests: Vec<String>,
    pub suite: TestSuite,
    pub grouped: GroupedTestResults,
}

impl ParseResult {
    pub fn total(&self) -> usize {
        self.passed_tests.len() + self.failed_tests.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_tests.is_empty()
    }

    /// Compact JSON form, used for debug logging of parsed reports.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
