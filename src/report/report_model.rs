use serde::{Deserialize, Serialize};

use crate::spec::spec_model::{AssertionResult, TestResult};

// ============================================================================
// Suite report: every script run in one invocation
// ============================================================================

/// Aggregated results of a `clickthrough run`.
///
/// Built with `from_results()` and rendered by the console and JUnit
/// reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteReport {
    pub suite_name: String,

    pub total: usize,

    pub passed: usize,

    pub failed: usize,

    /// Scripts that stopped on a step error rather than a failed assertion
    pub errored: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub test_results: Vec<TestResult>,
}

impl TestSuiteReport {
    pub fn from_results(suite_name: &str, results: Vec<TestResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let errored = results
            .iter()
            .filter(|r| !r.passed && r.error.is_some())
            .count();
        Self {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed: total - passed,
            errored,
            duration_ms: None,
            test_results: results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn assertion_count(&self) -> usize {
        self.test_results
            .iter()
            .map(|r| r.assertion_results.len())
            .sum()
    }
}

/// Failed assertions of one script, in step order.
pub fn failed_assertions(result: &TestResult) -> impl Iterator<Item = &AssertionResult> {
    result.assertion_results.iter().filter(|ar| !ar.passed)
}
