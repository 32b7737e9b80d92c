use std::path::{Component, Path, PathBuf};

use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::Outcome;

// ============================================================================
// HTML reporter: self-contained HTML report
// ============================================================================

/// Generate a self-contained HTML report.
///
/// Features:
/// - Green/red header based on overall pass/fail
/// - Summary bar with passed/failed/errored/total counts
/// - Each test case in its own section, tagged with its priority
/// - Failed assertions and errors highlighted in red
/// - Failure screenshots linked relative to `report_dir`
/// - Inline CSS (no external dependencies)
pub fn generate_html_report(report: &TestSuiteReport, report_dir: &Path) -> String {
    let header_color = if report.all_passed() {
        "#4CAF50"
    } else {
        "#f44336"
    };

    let status_text = if report.all_passed() {
        "ALL TESTS PASSED"
    } else {
        "SOME TESTS FAILED"
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut test_cases = String::new();
    for result in &report.test_results {
        let (case_class, case_marker) = match result.outcome {
            Outcome::Passed => ("pass", "\u{2713}"),
            Outcome::Failed => ("fail", "\u{2717}"),
            Outcome::Errored => ("error", "!"),
        };

        test_cases.push_str(&format!(
            r#"<div class="test-case {class}">
<h3>{marker} {id} {name} <span class="priority">{priority}</span></h3>
<p>Outcome: {outcome} | Assertions: {assertions} | {duration} ms</p>
"#,
            class = case_class,
            marker = case_marker,
            id = escape_html(&result.id),
            name = escape_html(&result.name),
            priority = result.priority,
            outcome = result.outcome,
            assertions = result.assertion_results.len(),
            duration = result.duration_ms,
        ));

        // Show error
        if let Some(ref error) = result.error {
            test_cases.push_str(&format!(
                "<p class=\"error\">Error: {}</p>\n",
                escape_html(error)
            ));
        }

        // Show failed assertions
        let failed: Vec<_> = result.failed_assertions().collect();
        if !failed.is_empty() {
            test_cases.push_str("<ul class=\"failures\">\n");
            for ar in failed {
                let msg = ar.message.as_deref().unwrap_or("assertion failed");
                test_cases.push_str(&format!("<li>{}</li>\n", escape_html(msg)));
            }
            test_cases.push_str("</ul>\n");
        }

        if let Some(ref path) = result.screenshot {
            let href = escape_html(&relative_link(path, report_dir).display().to_string());
            let label = escape_html(&path.display().to_string());
            test_cases.push_str(&format!(
                "<p class=\"screenshot\">Screenshot: <a href=\"{href}\">{label}</a></p>\n"
            ));
        }

        test_cases.push_str("</div>\n");
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{suite_name} - Test Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.test-case {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; border-left: 4px solid #ccc; }}
.test-case.pass {{ border-left-color: #4CAF50; }}
.test-case.fail {{ border-left-color: #f44336; }}
.test-case.error {{ border-left-color: #ff9800; }}
.test-case h3 {{ margin: 0 0 8px 0; font-size: 16px; }}
.test-case p {{ margin: 4px 0; color: #666; font-size: 14px; }}
.test-case .error {{ color: #f44336; font-weight: bold; }}
.priority {{ font-size: 12px; color: #888; font-weight: normal; }}
.failures {{ margin: 8px 0 0 0; padding-left: 20px; }}
.failures li {{ color: #c62828; font-size: 13px; margin-bottom: 4px; }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed, {errored} errored ({total} total){duration}</p>
</div>
<div class="content">
{test_cases}
</div>
</body>
</html>"##,
        suite_name = escape_html(&report.suite_name),
        header_color = header_color,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        errored = report.errored,
        total = report.total,
        duration = duration_text,
        test_cases = test_cases,
    )
}

/// `target` as seen from a document in `base_dir`.
///
/// Both paths are taken relative to the same working directory; absolute
/// targets outside `base_dir` are returned unchanged.
pub fn relative_link(target: &Path, base_dir: &Path) -> PathBuf {
    if let Ok(rest) = target.strip_prefix(base_dir) {
        return rest.to_path_buf();
    }
    if target.is_absolute() || base_dir.is_absolute() {
        return target.to_path_buf();
    }
    let mut link = PathBuf::new();
    for component in base_dir.components() {
        if matches!(component, Component::Normal(_)) {
            link.push("..");
        }
    }
    link.join(target)
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
