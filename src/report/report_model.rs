use serde::{Deserialize, Serialize};

use crate::scenario::scenario_model::{Outcome, TestResult};

// ============================================================================
// Test suite report: aggregates multiple TestResult instances
// ============================================================================

/// Aggregated report for one run of the suite.
///
/// Built from a `Vec<TestResult>` via `from_results()`. Consumed by
/// console, HTML, and JUnit reporters to produce human-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteReport {
    /// Name of the test suite
    pub suite_name: String,

    /// Total number of tests
    pub total: usize,

    /// Number of passing tests
    pub passed: usize,

    /// Number of tests with a failed assertion
    pub failed: usize,

    /// Number of tests aborted by a driver, fixture or I/O fault
    pub errored: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Individual test results
    pub test_results: Vec<TestResult>,
}

impl TestSuiteReport {
    /// Build a suite report from a list of test results.
    ///
    /// Automatically computes total, passed, failed and errored counts.
    pub fn from_results(suite_name: &str, results: Vec<TestResult>) -> Self {
        let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let passed = count(Outcome::Passed);
        let failed = count(Outcome::Failed);
        let errored = count(Outcome::Errored);
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed,
            failed,
            errored,
            duration_ms: None,
            test_results: results,
        }
    }

    /// Set the total execution duration.
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether all tests in the suite passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}
