use crate::report::report_model::{TestSuiteReport, failed_assertions};
use crate::spec::spec_model::TestResult;

const CLASSNAME: &str = "clickthrough";

// ============================================================================
// JUnit XML reporter
// ============================================================================

/// Render a suite report as JUnit XML.
///
/// A script that stopped on a step error becomes an `<error>` element;
/// failed assertions become a single `<failure>`.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="checkout" tests="2" failures="1" errors="0" time="0.412">
///   <testcase name="Delete a post" classname="clickthrough" />
///   <testcase name="Cancel a delete" classname="clickthrough">
///     <failure message="1 assertion(s) failed" type="AssertionFailure">Step 2: ...</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &TestSuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let cases: String = report.test_results.iter().map(testcase).collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed - report.errored,
        errors = report.errored,
        time = time_attr,
        cases = cases,
    )
}

fn testcase(result: &TestResult) -> String {
    let name = escape_xml(&result.spec_name);
    if result.passed {
        return format!("  <testcase name=\"{}\" classname=\"{}\" />\n", name, CLASSNAME);
    }

    let failures: Vec<String> = failed_assertions(result)
        .map(|ar| {
            format!(
                "Step {}: {}",
                ar.step_index,
                ar.message.as_deref().unwrap_or("assertion failed")
            )
        })
        .collect();

    let mut inner = String::new();
    if !failures.is_empty() {
        inner.push_str(&format!(
            "    <failure message=\"{} assertion(s) failed\" type=\"AssertionFailure\">{}</failure>\n",
            failures.len(),
            escape_xml(&failures.join("\n"))
        ));
    }
    if let Some(ref error) = result.error {
        inner.push_str(&format!(
            "    <error message=\"{}\" type=\"StepError\" />\n",
            escape_xml(error)
        ));
    }

    format!(
        "  <testcase name=\"{}\" classname=\"{}\">\n{}  </testcase>\n",
        name, CLASSNAME, inner
    )
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
