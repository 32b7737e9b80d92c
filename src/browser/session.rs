use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::browser::driver::{BrowserDriver, ElementRef};
use crate::browser::locator::Locator;
use crate::error::{Result, SuiteError};

/// Default explicit wait applied to every element condition.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default delay between two polls of the DOM.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time a single condition is polled for.
    pub timeout: Duration,
    /// Delay between two polls.
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Outcome of a visibility probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// An element matched and is displayed.
    Visible,
    /// An element matched but never became displayed.
    Hidden,
    /// Nothing matched within the wait window.
    Absent,
}

/// The single browser session of a run, with explicit-wait semantics on top
/// of a raw [`BrowserDriver`].
///
/// Two kinds of operations:
/// - "must exist" primitives (`find`, `click_when_ready`, `type_into`,
///   `text_of`) fail with [`SuiteError::NotFound`] on timeout;
/// - probes (`is_visible`, `is_present`, `find_all`, `wait_until_gone`,
///   alert helpers) degrade to `false` / empty / `None` and never report a
///   missing element as an error.
///
/// Either kind propagates non-transient driver faults (browser crashed,
/// session deleted) as `Err`.
pub struct BrowserSession {
    driver: Box<dyn BrowserDriver>,
    config: WaitConfig,
}

impl BrowserSession {
    pub fn new(driver: Box<dyn BrowserDriver>, config: WaitConfig) -> Self {
        BrowserSession { driver, config }
    }

    pub fn config(&self) -> WaitConfig {
        self.config
    }

    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    /// Poll `attempt` until it yields a value or `timeout` elapses.
    ///
    /// The attempt always runs at least once. Transient driver errors count
    /// as "not yet"; any other error aborts the wait.
    fn poll<T>(
        &self,
        timeout: Duration,
        what: &str,
        mut attempt: impl FnMut() -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let start = Instant::now();
        loop {
            match attempt() {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {}
                Err(e) if e.is_transient() => trace!(condition = what, error = %e, "transient driver error"),
                Err(e) => return Err(e),
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                debug!(condition = what, ?timeout, "wait timed out");
                return Ok(None);
            }
            thread::sleep(self.config.poll_interval.min(timeout - elapsed));
        }
    }

    fn first(&self, locator: &Locator) -> Result<Option<ElementRef>> {
        Ok(self.driver.find_elements(locator)?.into_iter().next())
    }

    fn not_found(&self, locator: &Locator) -> SuiteError {
        SuiteError::NotFound {
            locator: locator.clone(),
            timeout: self.config.timeout,
        }
    }

    // ------------------------------------------------------------------
    // Must-exist primitives
    // ------------------------------------------------------------------

    /// Wait for an element to be attached to the DOM.
    pub fn find(&self, locator: &Locator) -> Result<ElementRef> {
        self.poll(self.config.timeout, "presence", || self.first(locator))?
            .ok_or_else(|| self.not_found(locator))
    }

    /// Wait for at least one matching element. Times out to an empty list.
    pub fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let found = self.poll(self.config.timeout, "presence of all", || {
            let elements = self.driver.find_elements(locator)?;
            Ok(if elements.is_empty() { None } else { Some(elements) })
        })?;
        Ok(found.unwrap_or_default())
    }

    /// Wait until the element is displayed and enabled, then click it.
    /// Clicks rejected because the element is obscured are retried.
    pub fn click_when_ready(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "click");
        self.poll(self.config.timeout, "clickable", || {
            let Some(element) = self.first(locator)? else {
                return Ok(None);
            };
            if !self.driver.is_displayed(&element)? || !self.driver.is_enabled(&element)? {
                return Ok(None);
            }
            self.driver.click(&element)?;
            Ok(Some(()))
        })?
        .ok_or_else(|| self.not_found(locator))
    }

    /// Replace the element's value with `text`.
    pub fn type_into(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!(%locator, text, "type");
        let element = self.find(locator)?;
        self.driver.clear(&element)?;
        self.driver.send_keys(&element, text)
    }

    pub fn text_of(&self, locator: &Locator) -> Result<String> {
        let element = self.find(locator)?;
        self.driver.text(&element)
    }

    // ------------------------------------------------------------------
    // Probes
    // ------------------------------------------------------------------

    /// Poll until the first matching element is displayed.
    pub fn probe(&self, locator: &Locator) -> Result<Probe> {
        let mut attached = false;
        let visible = self.poll(self.config.timeout, "visibility", || {
            let Some(element) = self.first(locator)? else {
                attached = false;
                return Ok(None);
            };
            attached = true;
            Ok(self.driver.is_displayed(&element)?.then_some(()))
        })?;

        Ok(match (visible, attached) {
            (Some(()), _) => Probe::Visible,
            (None, true) => Probe::Hidden,
            (None, false) => Probe::Absent,
        })
    }

    pub fn is_visible(&self, locator: &Locator) -> Result<bool> {
        Ok(self.probe(locator)? == Probe::Visible)
    }

    pub fn is_present(&self, locator: &Locator) -> Result<bool> {
        match self.find(locator) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Best-effort wait for the element to detach or hide.
    pub fn wait_until_gone(&self, locator: &Locator) -> Result<()> {
        self.poll(self.config.timeout, "invisibility", || {
            let Some(element) = self.first(locator)? else {
                return Ok(Some(()));
            };
            match self.driver.is_displayed(&element) {
                Ok(displayed) => Ok((!displayed).then_some(())),
                // A stale reference means the element was detached.
                Err(e) if e.is_transient() => Ok(Some(())),
                Err(e) => Err(e),
            }
        })?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Guard-then-act
    // ------------------------------------------------------------------

    /// Click the element if it becomes visible; `Ok(false)` otherwise.
    pub fn click_if_visible(&self, locator: &Locator) -> Result<bool> {
        if !self.is_visible(locator)? {
            return Ok(false);
        }
        absorb_not_found(self.click_when_ready(locator))
    }

    /// Type into the element if it becomes visible; `Ok(false)` otherwise.
    pub fn type_if_visible(&self, locator: &Locator, text: &str) -> Result<bool> {
        if !self.is_visible(locator)? {
            return Ok(false);
        }
        absorb_not_found(self.type_into(locator, text))
    }

    /// Read the element's text if it becomes visible; `Ok(None)` otherwise.
    pub fn text_if_visible(&self, locator: &Locator) -> Result<Option<String>> {
        if !self.is_visible(locator)? {
            return Ok(None);
        }
        match self.text_of(locator) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    pub fn wait_for_alert(&self, timeout: Duration) -> bool {
        match self.poll(timeout, "alert", || self.driver.alert_text().map(Some)) {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(error = %e, "alert wait aborted");
                false
            }
        }
    }

    pub fn alert_text(&self) -> Option<String> {
        self.driver
            .alert_text()
            .map_err(|e| debug!(error = %e, "no alert text"))
            .ok()
    }

    pub fn accept_alert(&self) -> bool {
        self.driver
            .accept_alert()
            .map_err(|e| warn!(error = %e, "failed to accept alert"))
            .is_ok()
    }

    pub fn dismiss_alert(&self) -> bool {
        self.driver
            .dismiss_alert()
            .map_err(|e| warn!(error = %e, "failed to dismiss alert"))
            .is_ok()
    }

    // ------------------------------------------------------------------
    // Session-level commands
    // ------------------------------------------------------------------

    pub fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        self.driver.navigate(url)
    }

    pub fn current_url(&self) -> Result<String> {
        self.driver.current_url()
    }

    pub fn title(&self) -> Result<String> {
        self.driver.title()
    }

    /// Delete cookies and clear local/session storage.
    pub fn clear_storage(&self) -> Result<()> {
        self.driver.delete_all_cookies()?;
        self.driver.execute_script("window.localStorage.clear();")?;
        self.driver.execute_script("window.sessionStorage.clear();")?;
        Ok(())
    }

    pub fn save_screenshot(&self, path: &Path) -> Result<()> {
        let png = self.driver.screenshot()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Let the UI settle between steps.
    pub fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }

    pub fn quit(&self) -> Result<()> {
        self.driver.quit()
    }
}

fn absorb_not_found(result: Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}
