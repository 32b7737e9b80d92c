use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::{Outcome, TestResult};

/// `classname` attribute of every test case.
const CLASSNAME: &str = "pos-ui-suite";

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// Failed assertions become `<failure>`, aborted scenarios become `<error>`:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" errors="1" time="1.234">
///   <testcase name="TC_001 test_valid_login" classname="pos-ui-suite" time="0.812" />
///   <testcase name="TC_002 ..." classname="pos-ui-suite" time="0.301">
///     <failure message="1 assertion(s) failed" type="AssertionFailure">...</failure>
///   </testcase>
///   <testcase name="TC_005 ..." classname="pos-ui-suite" time="0.010">
///     <error message="..." type="ExecutionError">...</error>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &TestSuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.test_results {
        let name = escape_xml(&format!("{} {}", result.id, result.name));
        let time = result.duration_ms as f64 / 1000.0;

        match result.outcome {
            Outcome::Passed => cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\" />\n",
                name, CLASSNAME, time
            )),
            Outcome::Failed | Outcome::Errored => {
                let (tag, kind, message) = failure_element(result);
                cases.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"{class}\" time=\"{time:.3}\">\n    <{tag} message=\"{message}\" type=\"{kind}\">{body}</{tag}>\n  </testcase>\n",
                    name = name,
                    class = CLASSNAME,
                    time = time,
                    tag = tag,
                    message = escape_xml(&message),
                    kind = kind,
                    body = escape_xml(&failure_body(result)),
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        errors = report.errored,
        time = time_attr,
        cases = cases,
    )
}

fn failure_element(result: &TestResult) -> (&'static str, &'static str, String) {
    match result.outcome {
        Outcome::Errored => (
            "error",
            "ExecutionError",
            result.error.clone().unwrap_or_else(|| "execution error".to_string()),
        ),
        _ => (
            "failure",
            "AssertionFailure",
            format!("{} assertion(s) failed", result.failed_assertions().count()),
        ),
    }
}

fn failure_body(result: &TestResult) -> String {
    let mut parts: Vec<String> = result
        .failed_assertions()
        .map(|ar| ar.message.clone().unwrap_or_else(|| "assertion failed".to_string()))
        .collect();
    if let Some(ref error) = result.error {
        parts.push(format!("Error: {}", error));
    }
    if let Some(ref path) = result.screenshot {
        parts.push(format!("Screenshot: {}", path.display()));
    }
    parts.join("\n")
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
