use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SuiteError;

/// Importance marker carried by every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
        }
    }
}

/// Final status of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// An assertion did not hold.
    Failed,
    /// A driver, fixture or I/O fault aborted the scenario.
    Errored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed => write!(f, "failed"),
            Outcome::Errored => write!(f, "errored"),
        }
    }
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// What was checked, in words.
    pub description: String,

    pub passed: bool,

    /// Observed value, when one was read from the page.
    pub actual: Option<String>,

    /// Failure message naming what was expected and what was seen.
    pub message: Option<String>,
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Catalog id, e.g. `TC_011`.
    pub id: String,

    pub name: String,

    pub priority: Priority,

    pub outcome: Outcome,

    /// All assertion results collected during the run.
    pub assertion_results: Vec<AssertionResult>,

    /// Fault that aborted the scenario, for [`Outcome::Errored`].
    pub error: Option<String>,

    /// Screenshot captured after a non-passing run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,

    pub duration_ms: u128,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertion_results.iter().filter(|ar| !ar.passed)
    }
}

/// Why a scenario body stopped early.
#[derive(Debug)]
pub enum Halt {
    /// A required assertion failed; it is already recorded in the context.
    Assertion(String),
    Fault(SuiteError),
}

impl From<SuiteError> for Halt {
    fn from(e: SuiteError) -> Self {
        Halt::Fault(e)
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Assertion(message) => write!(f, "{}", message),
            Halt::Fault(e) => write!(f, "{}", e),
        }
    }
}

pub type StepResult = std::result::Result<(), Halt>;

/// Run-wide parameters shared by every scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSettings {
    pub base_url: String,
    pub admin_email: String,
    pub admin_password: String,
    /// How long checkout waits for the confirmation alert.
    pub alert_timeout: Duration,
    /// Pause between UI steps that trigger re-rendering.
    pub settle: Duration,
    pub screenshots_dir: PathBuf,
}
