use crate::spec::spec_model::{AssertionResult, TestResult};

/// Accumulates assertion results while a spec runs.
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    pub current_step: usize,
    pub assertion_results: Vec<AssertionResult>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_assertions(&mut self, results: Vec<AssertionResult>) {
        self.assertion_results.extend(results);
    }

    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }

    /// Close the run: passed only if no error occurred and every assertion held.
    pub fn finish(self, spec_name: &str, steps_run: usize, error: Option<String>) -> TestResult {
        let passed = error.is_none() && self.all_passed();
        TestResult {
            spec_name: spec_name.to_string(),
            passed,
            steps_run,
            assertion_results: self.assertion_results,
            error,
        }
    }
}
