use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::browser::session::BrowserSession;
use crate::browser::webdriver::WebDriverSession;
use crate::cli::config::AppConfig;
use crate::fixture::data::Fixtures;
use crate::report::console::format_console_report;
use crate::report::html::generate_html_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::TestSuiteReport;
use crate::scenario::catalog::{Scenario, catalog, select};
use crate::scenario::runner::SuiteRunner;
use crate::trace::journal::RunJournal;

/// Name printed at the top of every report.
pub const SUITE_NAME: &str = "POS UI Suite";

// ============================================================================
// run subcommand
// ============================================================================

/// Run the suite and return whether every scenario passed.
pub fn cmd_run(config: &AppConfig, filter: Option<&str>) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = select(catalog(), filter);

    if scenarios.is_empty() {
        eprintln!("No scenarios match filter: {}", filter.unwrap_or_default());
        return Ok(false);
    }

    prepare_output_dirs(config)?;

    let options = config.webdriver_options()?;
    let driver = WebDriverSession::launch(&options)?;
    let session = BrowserSession::new(Box::new(driver), config.wait_config());

    run_and_report(&session, config, &scenarios)
}

/// Run `scenarios`, write the report, then quit the browser.
///
/// A failed quit is logged and does not discard the report.
pub fn run_and_report(
    session: &BrowserSession,
    config: &AppConfig,
    scenarios: &[Scenario],
) -> Result<bool, Box<dyn std::error::Error>> {
    info!(count = scenarios.len(), base_url = %config.app.base_url, "running scenarios");

    let report = run_scenarios(session, config, scenarios);
    write_report(config, &report)?;

    if let Err(e) = session.quit() {
        warn!(error = %e, "failed to quit browser session");
    }
    Ok(report.all_passed())
}

/// Run `scenarios` on an open session and aggregate the results.
pub fn run_scenarios(session: &BrowserSession, config: &AppConfig, scenarios: &[Scenario]) -> TestSuiteReport {
    let settings = config.suite_settings();
    let fixtures = Fixtures::new(&config.paths.data_dir);
    let journal = RunJournal::open(&config.journal_path());

    let start = Instant::now();
    let results = SuiteRunner::new(session, &settings, &fixtures)
        .with_journal(&journal)
        .run_all(scenarios);
    let duration = start.elapsed().as_millis();

    TestSuiteReport::from_results(SUITE_NAME, results).with_duration(duration)
}

/// Create the reports and screenshots directories.
pub fn prepare_output_dirs(config: &AppConfig) -> std::io::Result<()> {
    for dir in config.output_dirs() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Render the report in the configured format.
///
/// `report_dir` is where the rendered file will live; HTML screenshot links
/// are made relative to it.
pub fn render_report(format: &str, report: &TestSuiteReport, report_dir: &Path) -> String {
    match format {
        "html" => generate_html_report(report, report_dir),
        "junit" => generate_junit_xml(report),
        _ => format_console_report(report),
    }
}

/// Write the report to its destination, or print it.
pub fn write_report(config: &AppConfig, report: &TestSuiteReport) -> std::io::Result<()> {
    let destination = config.report_destination();
    let report_dir = destination
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new);
    let content = render_report(&config.run.format, report, &report_dir);
    match destination {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &content)?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

// ============================================================================
// list subcommand
// ============================================================================

pub fn cmd_list(filter: Option<&str>) {
    print!("{}", format_scenario_list(&select(catalog(), filter)));
}

/// One line per scenario: id, priority, name and title.
pub fn format_scenario_list(scenarios: &[Scenario]) -> String {
    scenarios
        .iter()
        .map(|s| format!("{}  [{}]  {}  {}\n", s.id, s.priority, s.name, s.title))
        .collect()
}
