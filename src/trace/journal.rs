use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::warn;

use crate::scenario::scenario_model::{Outcome, TestResult};

/// One line of the run journal.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEvent {
    pub timestamp_ms: u128,
    pub scenario: String,
    pub event: JournalKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_assertions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    Started,
    Finished,
}

impl JournalEvent {
    pub fn started(scenario_id: &str) -> Self {
        Self {
            timestamp_ms: now_ms(),
            scenario: scenario_id.to_string(),
            event: JournalKind::Started,
            outcome: None,
            duration_ms: None,
            failed_assertions: None,
            screenshot: None,
            error: None,
        }
    }

    pub fn finished(result: &TestResult) -> Self {
        Self {
            timestamp_ms: now_ms(),
            scenario: result.id.clone(),
            event: JournalKind::Finished,
            outcome: Some(result.outcome),
            duration_ms: Some(result.duration_ms),
            failed_assertions: Some(result.failed_assertions().count()),
            screenshot: result.screenshot.clone(),
            error: result.error.clone(),
        }
    }
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Append-only JSONL log of scenario events.
///
/// Never fails the run: an unopenable file disables the journal, and write
/// errors are logged and dropped.
pub struct RunJournal {
    file: Option<Mutex<File>>,
}

impl RunJournal {
    pub fn open(path: &Path) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open run journal");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn record(&self, event: &JournalEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // journal disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "failed to serialize journal event");
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "run journal lock poisoned");
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            warn!(error = %e, "failed to write journal event");
        }
    }
}
