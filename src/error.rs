use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::browser::locator::Locator;

/// WebDriver error codes that mean "the element is not ready yet" rather
/// than "the session is broken". Poll loops keep polling on these.
const TRANSIENT_DRIVER_ERRORS: &[&str] = &[
    "no such element",
    "stale element reference",
    "element not interactable",
    "element click intercepted",
    "no such alert",
];

#[derive(Debug, Error)]
pub enum SuiteError {
    /// A required element never appeared within the explicit wait window.
    #[error("Element {locator} not found within {timeout:?}")]
    NotFound { locator: Locator, timeout: Duration },

    /// The WebDriver endpoint answered with an error payload.
    #[error("WebDriver command '{command}' failed ({error}): {message}")]
    Driver {
        command: String,
        error: String,
        message: String,
    },

    /// The WebDriver endpoint could not be reached.
    #[error("WebDriver transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    #[error("Screenshot payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read fixture file {path}: {source}")]
    FixtureFile { path: PathBuf, source: csv::Error },

    /// Unknown `test_case` identifier: a test-authoring bug, not a runtime condition.
    #[error("{table} test case not found: {case}")]
    FixtureCaseNotFound { table: String, case: String },

    #[error("Fixture case '{case}' has no field '{field}'")]
    FixtureField { case: String, field: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SuiteError {
    pub fn driver(command: &str, error: &str, message: &str) -> Self {
        SuiteError::Driver {
            command: command.to_string(),
            error: error.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SuiteError::NotFound { .. })
    }

    /// Whether the failure is an element race a poll loop should absorb.
    pub fn is_transient(&self) -> bool {
        match self {
            SuiteError::Driver { error, .. } => TRANSIENT_DRIVER_ERRORS.contains(&error.as_str()),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SuiteError>;
