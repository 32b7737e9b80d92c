use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::browser::session::BrowserSession;
use crate::fixture::data::Fixtures;
use crate::scenario::catalog::Scenario;
use crate::scenario::context::ScenarioContext;
use crate::scenario::scenario_model::{Halt, Outcome, StepResult, SuiteSettings, TestResult};
use crate::trace::journal::{JournalEvent, RunJournal};

/// Runs scenarios one after another on a single browser session.
///
/// Each scenario gets a fresh start: setup navigates to the base URL and
/// teardown clears cookies plus local/session storage, whatever the outcome.
/// A scenario that does not pass leaves a screenshot behind.
pub struct SuiteRunner<'a> {
    session: &'a BrowserSession,
    settings: &'a SuiteSettings,
    fixtures: &'a Fixtures,
    journal: Option<&'a RunJournal>,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(session: &'a BrowserSession, settings: &'a SuiteSettings, fixtures: &'a Fixtures) -> Self {
        SuiteRunner {
            session,
            settings,
            fixtures,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: &'a RunJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<TestResult> {
        scenarios.iter().map(|s| self.run(s)).collect()
    }

    /// Run one scenario through setup, body and teardown.
    pub fn run(&self, scenario: &Scenario) -> TestResult {
        info!(id = scenario.id, name = scenario.name, "scenario started");
        if let Some(journal) = self.journal {
            journal.record(&JournalEvent::started(scenario.id));
        }

        let start = Instant::now();
        let mut ctx = ScenarioContext::new(self.session, self.settings, self.fixtures);
        let body = self.setup().and_then(|()| (scenario.body)(&mut ctx));
        let (outcome, error) = classify(body, ctx.all_passed());

        let screenshot = match outcome {
            Outcome::Passed => None,
            Outcome::Failed | Outcome::Errored => self.capture_failure(scenario.name),
        };
        self.teardown();

        let result = TestResult {
            id: scenario.id.to_string(),
            name: scenario.name.to_string(),
            priority: scenario.priority,
            outcome,
            assertion_results: ctx.assertion_results,
            error,
            screenshot,
            duration_ms: start.elapsed().as_millis(),
        };

        info!(id = scenario.id, outcome = %result.outcome, duration_ms = result.duration_ms, "scenario finished");
        if let Some(journal) = self.journal {
            journal.record(&JournalEvent::finished(&result));
        }
        result
    }

    fn setup(&self) -> StepResult {
        self.session.navigate(&self.settings.base_url)?;
        Ok(())
    }

    fn teardown(&self) {
        if let Err(e) = self.session.clear_storage() {
            warn!(error = %e, "teardown could not clear browser storage");
        }
    }

    /// Path of the screenshot taken when the named scenario does not pass.
    pub fn screenshot_path(&self, name: &str) -> PathBuf {
        self.settings.screenshots_dir.join(format!("{}_call.png", name))
    }

    fn capture_failure(&self, name: &str) -> Option<PathBuf> {
        let path = self.screenshot_path(name);
        match self.session.save_screenshot(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not save failure screenshot");
                None
            }
        }
    }
}

/// Map a scenario body's result to its outcome.
///
/// An assertion halt is a failure; a fault (driver, fixture, I/O) is an
/// error. A body that returned normally still fails if any recorded
/// assertion did not hold.
pub fn classify(body: StepResult, assertions_passed: bool) -> (Outcome, Option<String>) {
    match body {
        Ok(()) if assertions_passed => (Outcome::Passed, None),
        Ok(()) => (Outcome::Failed, None),
        Err(Halt::Assertion(_)) => (Outcome::Failed, None),
        Err(Halt::Fault(e)) => (Outcome::Errored, Some(e.to_string())),
    }
}
