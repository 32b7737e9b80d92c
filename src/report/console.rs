use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::Outcome;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a test suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Suite: POS UI Suite ===
///
/// ✓ PASS   TC_001 test_valid_login [high] (2 assertions)
/// ✗ FAIL   TC_002 test_invalid_login_credentials [medium] (1 assertions)
///     [FAIL] Should still be on login page after invalid login ...
///     [SCREENSHOT] reports/screenshots/test_invalid_login_credentials_call.png
/// ! ERROR  TC_005 test_search_products_by_name [high] (0 assertions)
///     [ERROR] Search test case not found: search_wireless_headphones
///
/// === Results: 1 passed, 1 failed, 1 errored (3 total) in 12.3s ===
/// ```
pub fn format_console_report(report: &TestSuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Suite: {} ===\n\n", report.suite_name));

    for result in &report.test_results {
        let marker = match result.outcome {
            Outcome::Passed => "\u{2713} PASS ",
            Outcome::Failed => "\u{2717} FAIL ",
            Outcome::Errored => "! ERROR",
        };

        out.push_str(&format!(
            "{}  {} {} [{}] ({} assertions)\n",
            marker,
            result.id,
            result.name,
            result.priority,
            result.assertion_results.len()
        ));

        for ar in result.failed_assertions() {
            let detail = ar.message.as_deref().unwrap_or("assertion failed");
            out.push_str(&format!("    [FAIL] {}\n", detail));
        }

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        if let Some(ref path) = result.screenshot {
            out.push_str(&format!("    [SCREENSHOT] {}\n", path.display()));
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} errored ({} total)",
        report.passed, report.failed, report.errored, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
