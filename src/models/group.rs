use serde::Serialize;

use super::result::TestResult;

/// Results that share a task number.
#[derive(Debug, Clone, Serialize)]
pub struct TestClass {
    /// Machine key, e.g. `Task1` or `Uncategorized`.
    pub name: String,
    pub display_name: String,
    pub task_number: u32,
    pub tests: Vec<TestResult>,
    pub passed_count: usize,
    pub failed_count: usize,
    pub total_time: f64,
}

impl TestClass {
    pub fn is_uncategorized(&self) -> bool {
        self.task_number == 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedTestResults {
    /// Ascending by task number, so `Uncategorized` (0) comes first when present.
    pub classes: Vec<TestClass>,
    pub total_tests: usize,
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_time: f64,
}
