use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use pos_ui_suite::browser::driver::{BrowserDriver, ElementRef};
use pos_ui_suite::browser::locator::Locator;
use pos_ui_suite::browser::session::{BrowserSession, WaitConfig};
use pos_ui_suite::error::{Result, SuiteError};
use serde_json::Value;

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Millisecond waits so absent-element probes resolve quickly.
pub fn fast_waits() -> WaitConfig {
    WaitConfig::new(Duration::from_millis(40), Duration::from_millis(2))
}

// ============================================================================
// Simulated DOM
// ============================================================================

/// One rendered element. Ids are stable across renders.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: String,
    pub locator: Locator,
    pub text: String,
    pub displayed: bool,
    pub enabled: bool,
}

impl FakeElement {
    pub fn new(id: &str, locator: Locator) -> Self {
        Self {
            id: id.to_string(),
            locator,
            text: String::new(),
            displayed: true,
            enabled: true,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// An application rendered into the fake browser.
pub trait FakeApp {
    fn url(&self) -> String;

    fn title(&self) -> String {
        "Fake App".to_string()
    }

    fn navigate(&mut self, url: &str);

    /// The DOM as of now.
    fn elements(&mut self) -> Vec<FakeElement>;

    fn click(&mut self, id: &str);

    fn clear(&mut self, id: &str);

    fn send_keys(&mut self, id: &str, text: &str);

    /// `localStorage.clear()` / `sessionStorage.clear()`.
    fn clear_storage(&mut self);

    fn alert(&self) -> Option<String>;

    fn close_alert(&mut self);
}

// ============================================================================
// Browser
// ============================================================================

pub struct BrowserState<A> {
    pub app: A,
    /// Every command received, in order.
    pub log: Vec<String>,
    /// Scripted WebDriver error codes, consumed one per matching command.
    pub failures: HashMap<&'static str, VecDeque<&'static str>>,
    pub scripts: Vec<String>,
    pub quit_count: usize,
}

/// A scripted in-memory [`BrowserDriver`].
///
/// Elements are matched by locator equality against the app's current
/// render. Tests keep a [`FakeHandle`] to inspect and steer the browser
/// after the driver has been boxed into a session.
pub struct FakeBrowser<A> {
    state: Rc<RefCell<BrowserState<A>>>,
}

pub type FakeHandle<A> = Rc<RefCell<BrowserState<A>>>;

impl<A: FakeApp + 'static> FakeBrowser<A> {
    pub fn new(app: A) -> (Self, FakeHandle<A>) {
        let state = Rc::new(RefCell::new(BrowserState {
            app,
            log: Vec::new(),
            failures: HashMap::new(),
            scripts: Vec::new(),
            quit_count: 0,
        }));
        (
            FakeBrowser {
                state: Rc::clone(&state),
            },
            state,
        )
    }

    /// A session over a fresh fake browser, with fast waits.
    pub fn session(app: A) -> (BrowserSession, FakeHandle<A>) {
        let (browser, handle) = Self::new(app);
        (BrowserSession::new(Box::new(browser), fast_waits()), handle)
    }

    fn begin(&self, command: &'static str, detail: impl Into<String>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let detail = detail.into();
        state.log.push(if detail.is_empty() {
            command.to_string()
        } else {
            format!("{}:{}", command, detail)
        });
        let scripted = state.failures.get_mut(command).and_then(|queue| queue.pop_front());
        match scripted {
            Some(code) => Err(SuiteError::driver(command, code, "scripted failure")),
            None => Ok(()),
        }
    }

    fn element(&self, command: &'static str, element: &ElementRef) -> Result<FakeElement> {
        self.state
            .borrow_mut()
            .app
            .elements()
            .into_iter()
            .find(|e| e.id == element.id())
            .ok_or_else(|| {
                SuiteError::driver(command, "stale element reference", "element is not attached")
            })
    }
}

/// Queue a WebDriver error code for the next `command`.
pub fn fail_next<A>(handle: &FakeHandle<A>, command: &'static str, code: &'static str) {
    handle
        .borrow_mut()
        .failures
        .entry(command)
        .or_default()
        .push_back(code);
}

/// Log entries starting with `prefix`.
pub fn logged<A>(handle: &FakeHandle<A>, prefix: &str) -> Vec<String> {
    handle
        .borrow()
        .log
        .iter()
        .filter(|entry| entry.starts_with(prefix))
        .cloned()
        .collect()
}

impl<A: FakeApp + 'static> BrowserDriver for FakeBrowser<A> {
    fn navigate(&self, url: &str) -> Result<()> {
        self.begin("navigate", url)?;
        self.state.borrow_mut().app.navigate(url);
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        self.begin("get url", "")?;
        Ok(self.state.borrow().app.url())
    }

    fn title(&self) -> Result<String> {
        self.begin("get title", "")?;
        Ok(self.state.borrow().app.title())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        self.begin("find elements", locator.value.to_string())?;
        Ok(self
            .state
            .borrow_mut()
            .app
            .elements()
            .into_iter()
            .filter(|e| &e.locator == locator)
            .map(|e| ElementRef(e.id))
            .collect())
    }

    fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        self.begin("is displayed", element.id())?;
        Ok(self.element("is displayed", element)?.displayed)
    }

    fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        self.begin("is enabled", element.id())?;
        Ok(self.element("is enabled", element)?.enabled)
    }

    fn click(&self, element: &ElementRef) -> Result<()> {
        self.begin("click", element.id())?;
        let found = self.element("click", element)?;
        if !found.displayed {
            return Err(SuiteError::driver("click", "element not interactable", "element is hidden"));
        }
        self.state.borrow_mut().app.click(element.id());
        Ok(())
    }

    fn clear(&self, element: &ElementRef) -> Result<()> {
        self.begin("clear", element.id())?;
        self.element("clear", element)?;
        self.state.borrow_mut().app.clear(element.id());
        Ok(())
    }

    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.begin("send keys", format!("{}:{}", element.id(), text))?;
        self.element("send keys", element)?;
        self.state.borrow_mut().app.send_keys(element.id(), text);
        Ok(())
    }

    fn text(&self, element: &ElementRef) -> Result<String> {
        self.begin("get text", element.id())?;
        Ok(self.element("get text", element)?.text)
    }

    fn delete_all_cookies(&self) -> Result<()> {
        self.begin("delete cookies", "")
    }

    fn execute_script(&self, script: &str) -> Result<Value> {
        self.begin("execute script", script)?;
        let mut state = self.state.borrow_mut();
        state.scripts.push(script.to_string());
        if script.contains("Storage.clear()") {
            state.app.clear_storage();
        }
        Ok(Value::Null)
    }

    fn alert_text(&self) -> Result<String> {
        self.begin("get alert text", "")?;
        self.state
            .borrow()
            .app
            .alert()
            .ok_or_else(|| SuiteError::driver("get alert text", "no such alert", "no alert open"))
    }

    fn accept_alert(&self) -> Result<()> {
        self.begin("accept alert", "")?;
        let mut state = self.state.borrow_mut();
        if state.app.alert().is_none() {
            return Err(SuiteError::driver("accept alert", "no such alert", "no alert open"));
        }
        state.app.close_alert();
        Ok(())
    }

    fn dismiss_alert(&self) -> Result<()> {
        self.begin("dismiss alert", "")?;
        let mut state = self.state.borrow_mut();
        if state.app.alert().is_none() {
            return Err(SuiteError::driver("dismiss alert", "no such alert", "no alert open"));
        }
        state.app.close_alert();
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>> {
        self.begin("screenshot", "")?;
        Ok(FAKE_PNG.to_vec())
    }

    fn quit(&self) -> Result<()> {
        self.begin("quit", "")?;
        self.state.borrow_mut().quit_count += 1;
        Ok(())
    }
}

// ============================================================================
// Static page
// ============================================================================

/// A page with a fixed set of elements, some of which show up late.
#[derive(Default)]
pub struct StaticPage {
    pub url: String,
    entries: Vec<StaticEntry>,
    /// Number of renders so far; drives delayed elements.
    pub renders: usize,
    pub values: HashMap<String, String>,
    pub clicks: Vec<String>,
    /// Element id whose click opens the given alert.
    pub alert_on_click: HashMap<String, String>,
    pub alert: Option<String>,
    pub storage_cleared: usize,
}

struct StaticEntry {
    element: FakeElement,
    attach_after: usize,
    show_after: usize,
}

impl StaticPage {
    pub fn new() -> Self {
        Self {
            url: "http://static.test/".to_string(),
            ..Self::default()
        }
    }

    pub fn with(mut self, element: FakeElement) -> Self {
        self.entries.push(StaticEntry {
            element,
            attach_after: 0,
            show_after: 0,
        });
        self
    }

    /// Attach the element only once `renders` DOM reads have happened.
    pub fn with_late(mut self, element: FakeElement, renders: usize) -> Self {
        self.entries.push(StaticEntry {
            element,
            attach_after: renders,
            show_after: 0,
        });
        self
    }

    /// Attached from the start but hidden for the first `renders` reads.
    pub fn with_shown_after(mut self, element: FakeElement, renders: usize) -> Self {
        self.entries.push(StaticEntry {
            element,
            attach_after: 0,
            show_after: renders,
        });
        self
    }

    pub fn alert_when_clicked(mut self, id: &str, text: &str) -> Self {
        self.alert_on_click.insert(id.to_string(), text.to_string());
        self
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }
}

impl FakeApp for StaticPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn navigate(&mut self, url: &str) {
        self.url = url.to_string();
    }

    fn elements(&mut self) -> Vec<FakeElement> {
        self.renders += 1;
        let renders = self.renders;
        self.entries
            .iter()
            .filter(|entry| renders > entry.attach_after)
            .map(|entry| {
                let mut element = entry.element.clone();
                if renders <= entry.show_after {
                    element.displayed = false;
                }
                element
            })
            .collect()
    }

    fn click(&mut self, id: &str) {
        self.clicks.push(id.to_string());
        if let Some(text) = self.alert_on_click.get(id) {
            self.alert = Some(text.clone());
        }
    }

    fn clear(&mut self, id: &str) {
        self.values.insert(id.to_string(), String::new());
    }

    fn send_keys(&mut self, id: &str, text: &str) {
        self.values.entry(id.to_string()).or_default().push_str(text);
    }

    fn clear_storage(&mut self) {
        self.storage_cleared += 1;
    }

    fn alert(&self) -> Option<String> {
        self.alert.clone()
    }

    fn close_alert(&mut self) {
        self.alert = None;
    }
}
