use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::browser::session::WaitConfig;
use crate::browser::webdriver::{BrowserKind, WebDriverOptions};
use crate::error::{Result, SuiteError};
use crate::scenario::scenario_model::SuiteSettings;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pos-ui-suite.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "pos-ui-suite",
    version,
    about = "End-to-end UI test suite for the POS web application"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: pos-ui-suite.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario suite against the POS application
    Run {
        /// Output format: console, html, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout for console, reports/test_report.html / reports/junit.xml for others)
        #[arg(short, long)]
        output: Option<String>,

        /// Only run scenarios whose id or name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Run the browser without a window
        #[arg(long)]
        headless: bool,

        /// Application URL (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,

        /// WebDriver endpoint (overrides the config file)
        #[arg(long)]
        webdriver_url: Option<String>,
    },

    /// List the scenarios of the suite without running them
    List {
        /// Only list scenarios whose id or name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `pos-ui-suite.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub waits: WaitSection,
    #[serde(default)]
    pub paths: PathSection,
    #[serde(default)]
    pub run: RunSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSection {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_browser")]
    pub browser: String,

    #[serde(default)]
    pub headless: bool,

    /// `"<width>,<height>"`, as passed to `--window-size`.
    #[serde(default = "default_window_size")]
    pub window_size: String,

    #[serde(default = "default_true")]
    pub incognito: bool,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            browser: default_browser(),
            headless: false,
            window_size: default_window_size(),
            incognito: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitSection {
    #[serde(default = "default_explicit_wait")]
    pub explicit_wait_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_alert_wait")]
    pub alert_wait_secs: u64,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,
}

impl Default for WaitSection {
    fn default() -> Self {
        Self {
            explicit_wait_secs: default_explicit_wait(),
            poll_interval_ms: default_poll_interval(),
            alert_wait_secs: default_alert_wait(),
            settle_ms: default_settle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: PathBuf,
}

impl Default for PathSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
            screenshots_dir: default_screenshots_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSection {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            format: "console".to_string(),
            output: None,
        }
    }
}

// Serde default helpers
fn default_base_url() -> String { "https://simple-pos-pwdk.netlify.app/".to_string() }
fn default_admin_email() -> String { "admin@pos.com".to_string() }
fn default_admin_password() -> String { "admin".to_string() }
fn default_webdriver_url() -> String { "http://localhost:9515".to_string() }
fn default_browser() -> String { "chrome".to_string() }
fn default_window_size() -> String { "1920,1080".to_string() }
fn default_true() -> bool { true }
fn default_explicit_wait() -> u64 { 20 }
fn default_poll_interval() -> u64 { 250 }
fn default_alert_wait() -> u64 { 10 }
fn default_settle() -> u64 { 2000 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_reports_dir() -> PathBuf { PathBuf::from("reports") }
fn default_screenshots_dir() -> PathBuf { PathBuf::from("reports/screenshots") }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Command-line values that override the config file when given.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub format: Option<String>,
    pub output: Option<String>,
    pub headless: bool,
    pub base_url: Option<String>,
    pub webdriver_url: Option<String>,
}

impl AppConfig {
    /// Fold CLI overrides into the file values.
    pub fn apply(mut self, overrides: &RunOverrides) -> Self {
        if let Some(ref format) = overrides.format {
            self.run.format = format.clone();
        }
        if overrides.output.is_some() {
            self.run.output = overrides.output.clone();
        }
        if overrides.headless {
            self.browser.headless = true;
        }
        if let Some(ref url) = overrides.base_url {
            self.app.base_url = url.clone();
        }
        if let Some(ref url) = overrides.webdriver_url {
            self.browser.webdriver_url = url.clone();
        }
        self
    }

    pub fn webdriver_options(&self) -> Result<WebDriverOptions> {
        Ok(WebDriverOptions {
            webdriver_url: self.browser.webdriver_url.clone(),
            browser: self.browser.browser.parse::<BrowserKind>()?,
            headless: self.browser.headless,
            incognito: self.browser.incognito,
            window_size: parse_window_size(&self.browser.window_size)?,
        })
    }

    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_secs(self.waits.explicit_wait_secs),
            Duration::from_millis(self.waits.poll_interval_ms),
        )
    }

    pub fn suite_settings(&self) -> SuiteSettings {
        SuiteSettings {
            base_url: self.app.base_url.clone(),
            admin_email: self.app.admin_email.clone(),
            admin_password: self.app.admin_password.clone(),
            alert_timeout: Duration::from_secs(self.waits.alert_wait_secs),
            settle: Duration::from_millis(self.waits.settle_ms),
            screenshots_dir: self.paths.screenshots_dir.clone(),
        }
    }

    /// Where the run report goes; `None` means stdout.
    pub fn report_destination(&self) -> Option<PathBuf> {
        if let Some(ref output) = self.run.output {
            return Some(PathBuf::from(output));
        }
        let reports = &self.paths.reports_dir;
        match self.run.format.as_str() {
            "html" => Some(reports.join("test_report.html")),
            "junit" => Some(reports.join("junit.xml")),
            _ => None,
        }
    }

    pub fn journal_path(&self) -> PathBuf {
        self.paths.reports_dir.join("run_journal.jsonl")
    }

    /// Directories the run writes into.
    pub fn output_dirs(&self) -> [&Path; 2] {
        [self.paths.reports_dir.as_path(), self.paths.screenshots_dir.as_path()]
    }
}

/// Parse `"1920,1080"` (or `"1920x1080"`) into a width/height pair.
pub fn parse_window_size(text: &str) -> Result<(u32, u32)> {
    let invalid = || SuiteError::Config(format!("Invalid window size '{}', expected WIDTH,HEIGHT", text));
    let (width, height) = text
        .split_once(',')
        .or_else(|| text.split_once('x'))
        .ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}
