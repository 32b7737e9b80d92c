use std::cell::Cell;
use std::str::FromStr;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::browser::driver::{BrowserDriver, ElementRef};
use crate::browser::locator::Locator;
use crate::error::{Result, SuiteError};

/// W3C identifier under which element references are serialized.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// HTTP timeout for a single WebDriver command. Waiting for elements is done
/// by polling, so individual commands should return quickly.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(SuiteError::Config(format!("Browser {} is not supported", other))),
        }
    }
}

/// How to start a browser behind a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub incognito: bool,
    pub window_size: (u32, u32),
}

impl WebDriverOptions {
    /// The `alwaysMatch` capabilities object for a new-session request.
    pub fn capabilities(&self) -> Value {
        let (width, height) = self.window_size;
        match self.browser {
            BrowserKind::Chrome => {
                let mut args = vec![
                    "--no-sandbox".to_string(),
                    "--disable-dev-shm-usage".to_string(),
                    format!("--window-size={},{}", width, height),
                ];
                if self.incognito {
                    args.insert(0, "--incognito".to_string());
                }
                if self.headless {
                    args.push("--headless=new".to_string());
                }
                json!({
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                })
            }
            BrowserKind::Firefox => {
                let mut args = vec![format!("--width={}", width), format!("--height={}", height)];
                if self.incognito {
                    args.push("-private".to_string());
                }
                if self.headless {
                    args.push("-headless".to_string());
                }
                json!({
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": args },
                })
            }
        }
    }
}

/// Request bodies sent to the WebDriver endpoint.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WebDriverRequest {
    NewSession { capabilities: Value },
    NavigateTo { url: String },
    FindElements { using: &'static str, value: String },
    SendKeys { text: String },
    ExecuteScript { script: String, args: Vec<Value> },
    Empty {},
}

impl WebDriverRequest {
    pub fn new_session(options: &WebDriverOptions) -> Self {
        WebDriverRequest::NewSession {
            capabilities: json!({ "alwaysMatch": options.capabilities() }),
        }
    }

    pub fn navigate(url: &str) -> Self {
        WebDriverRequest::NavigateTo {
            url: url.to_string(),
        }
    }

    pub fn find_elements(locator: &Locator) -> Self {
        let (using, value) = locator.to_w3c();
        WebDriverRequest::FindElements { using, value }
    }

    pub fn send_keys(text: &str) -> Self {
        WebDriverRequest::SendKeys {
            text: text.to_string(),
        }
    }

    pub fn execute(script: &str) -> Self {
        WebDriverRequest::ExecuteScript {
            script: script.to_string(),
            args: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        WebDriverRequest::Empty {}
    }
}

/// Every WebDriver response wraps its payload in `value`.
#[derive(Debug, Default, Deserialize)]
pub struct WebDriverResponse {
    #[serde(default)]
    pub value: Value,
}

/// Shape of `value` when the command failed.
#[derive(Debug, Deserialize)]
pub struct WebDriverErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Decode a response body into its `value`, mapping error payloads onto
/// [`SuiteError::Driver`].
pub fn decode_response(command: &str, success: bool, body: &str) -> Result<Value> {
    let parsed: WebDriverResponse = if body.trim().is_empty() {
        WebDriverResponse::default()
    } else {
        serde_json::from_str(body).map_err(|e| SuiteError::Json {
            context: format!("WebDriver '{}' response", command),
            source: e,
        })?
    };

    if success {
        return Ok(parsed.value);
    }

    let error: WebDriverErrorValue =
        serde_json::from_value(parsed.value).unwrap_or_else(|_| WebDriverErrorValue {
            error: "unknown error".into(),
            message: "Malformed error payload".into(),
        });
    Err(SuiteError::driver(command, &error.error, &error.message))
}

/// Extract element references from a find-elements `value`.
pub fn parse_elements(value: &Value) -> Vec<ElementRef> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item[ELEMENT_KEY].as_str())
                .map(|id| ElementRef(id.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// A browser session behind a W3C WebDriver endpoint (chromedriver,
/// geckodriver, or a Selenium grid).
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
    closed: Cell<bool>,
}

impl WebDriverSession {
    /// Start a new browser session.
    pub fn launch(options: &WebDriverOptions) -> Result<Self> {
        let client = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        let base_url = options.webdriver_url.trim_end_matches('/').to_string();

        info!(endpoint = %base_url, browser = ?options.browser, headless = options.headless, "Starting WebDriver session");

        let response = client
            .post(format!("{}/session", base_url))
            .json(&WebDriverRequest::new_session(options))
            .send()?;
        let value = Self::read("new session", response)?;

        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| {
                SuiteError::driver("new session", "session not created", "No sessionId in response")
            })?
            .to_string();

        debug!(session_id = %session_id, "WebDriver session created");

        Ok(WebDriverSession {
            client,
            base_url,
            session_id,
            closed: Cell::new(false),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, path)
    }

    fn read(command: &str, response: Response) -> Result<Value> {
        let success = response.status().is_success();
        let body = response.text()?;
        decode_response(command, success, &body)
    }

    fn get(&self, command: &str, path: &str) -> Result<Value> {
        let response = self.client.get(self.endpoint(path)).send()?;
        Self::read(command, response)
    }

    fn post(&self, command: &str, path: &str, request: &WebDriverRequest) -> Result<Value> {
        let response = self.client.post(self.endpoint(path)).json(request).send()?;
        Self::read(command, response)
    }

    fn delete(&self, command: &str, path: &str) -> Result<Value> {
        let response = self.client.delete(self.endpoint(path)).send()?;
        Self::read(command, response)
    }

    fn element_path(element: &ElementRef, suffix: &str) -> String {
        format!("/element/{}/{}", element.id(), suffix)
    }

    fn string_value(command: &str, value: Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            other => Err(SuiteError::driver(
                command,
                "unknown error",
                &format!("Expected a string value, got {}", other),
            )),
        }
    }
}

impl BrowserDriver for WebDriverSession {
    fn navigate(&self, url: &str) -> Result<()> {
        self.post("navigate", "/url", &WebDriverRequest::navigate(url))?;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        let value = self.get("current_url", "/url")?;
        Self::string_value("current_url", value)
    }

    fn title(&self) -> Result<String> {
        let value = self.get("title", "/title")?;
        Self::string_value("title", value)
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let value = self.post(
            "find_elements",
            "/elements",
            &WebDriverRequest::find_elements(locator),
        )?;
        Ok(parse_elements(&value))
    }

    fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        let value = self.get("is_displayed", &Self::element_path(element, "displayed"))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        let value = self.get("is_enabled", &Self::element_path(element, "enabled"))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn click(&self, element: &ElementRef) -> Result<()> {
        self.post("click", &Self::element_path(element, "click"), &WebDriverRequest::empty())?;
        Ok(())
    }

    fn clear(&self, element: &ElementRef) -> Result<()> {
        self.post("clear", &Self::element_path(element, "clear"), &WebDriverRequest::empty())?;
        Ok(())
    }

    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.post(
            "send_keys",
            &Self::element_path(element, "value"),
            &WebDriverRequest::send_keys(text),
        )?;
        Ok(())
    }

    fn text(&self, element: &ElementRef) -> Result<String> {
        let value = self.get("text", &Self::element_path(element, "text"))?;
        Self::string_value("text", value)
    }

    fn delete_all_cookies(&self) -> Result<()> {
        self.delete("delete_all_cookies", "/cookie")?;
        Ok(())
    }

    fn execute_script(&self, script: &str) -> Result<Value> {
        self.post("execute_script", "/execute/sync", &WebDriverRequest::execute(script))
    }

    fn alert_text(&self) -> Result<String> {
        let value = self.get("alert_text", "/alert/text")?;
        Self::string_value("alert_text", value)
    }

    fn accept_alert(&self) -> Result<()> {
        self.post("accept_alert", "/alert/accept", &WebDriverRequest::empty())?;
        Ok(())
    }

    fn dismiss_alert(&self) -> Result<()> {
        self.post("dismiss_alert", "/alert/dismiss", &WebDriverRequest::empty())?;
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self.get("screenshot", "/screenshot")?;
        let encoded = Self::string_value("screenshot", value)?;
        Ok(STANDARD.decode(encoded.as_bytes())?)
    }

    fn quit(&self) -> Result<()> {
        if self.closed.replace(true) {
            return Ok(());
        }
        debug!(session_id = %self.session_id, "Deleting WebDriver session");
        let response = self
            .client
            .delete(format!("{}/session/{}", self.base_url, self.session_id))
            .send()?;
        Self::read("quit", response)?;
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
