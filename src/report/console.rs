use crate::report::report_model::{TestSuiteReport, failed_assertions};
use crate::spec::spec_model::AssertionSpec;

// ============================================================================
// Console reporter
// ============================================================================

/// Render a suite report for the terminal.
///
/// ```text
/// === Suite: checkout ===
///
/// ✓ PASS  Delete a post (4 steps, 2 assertions)
/// ✗ FAIL  Cancel a delete (3 steps, 1 assertions)
///     [FAIL] Step 2: popup_blocked (actual: true) A confirmation popup is still open
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &TestSuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Suite: {} ===\n\n", report.suite_name));

    for result in &report.test_results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.spec_name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for ar in failed_assertions(result) {
            let actual = ar
                .actual
                .as_deref()
                .map(|a| format!(" (actual: {})", a))
                .unwrap_or_default();
            out.push_str(&format!(
                "    [FAIL] Step {}: {}{} {}\n",
                ar.step_index,
                assertion_name(&ar.spec),
                actual,
                ar.message.as_deref().unwrap_or("assertion failed")
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}

/// The YAML `type` tag of an assertion.
pub fn assertion_name(spec: &AssertionSpec) -> &'static str {
    match spec {
        AssertionSpec::UrlEquals { .. } => "url_equals",
        AssertionSpec::UrlContains { .. } => "url_contains",
        AssertionSpec::TextPresent { .. } => "text_present",
        AssertionSpec::TextAbsent { .. } => "text_absent",
        AssertionSpec::PopupBlocked { .. } => "popup_blocked",
        AssertionSpec::PopupMessage { .. } => "popup_message",
        AssertionSpec::LinkPresent { .. } => "link_present",
        AssertionSpec::FieldValue { .. } => "field_value",
    }
}
