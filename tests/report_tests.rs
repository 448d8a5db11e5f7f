use clickthrough::report::console::{assertion_name, format_console_report};
use clickthrough::report::junit::{escape_xml, generate_junit_xml};
use clickthrough::report::report_model::TestSuiteReport;
use clickthrough::spec::spec_model::{AssertionResult, AssertionSpec, TestResult};

// ============================================================================
// Helper builders
// ============================================================================

fn passing_result(name: &str) -> TestResult {
    TestResult {
        spec_name: name.to_string(),
        passed: true,
        steps_run: 4,
        assertion_results: vec![AssertionResult {
            step_index: 3,
            spec: AssertionSpec::UrlEquals {
                expected: "/posts".into(),
            },
            passed: true,
            actual: Some("/posts".into()),
            message: None,
        }],
        error: None,
    }
}

fn failing_result(name: &str) -> TestResult {
    TestResult {
        spec_name: name.to_string(),
        passed: false,
        steps_run: 3,
        assertion_results: vec![AssertionResult {
            step_index: 2,
            spec: AssertionSpec::PopupBlocked { expected: false },
            passed: false,
            actual: Some("true".into()),
            message: Some("A confirmation popup is still open".into()),
        }],
        error: None,
    }
}

fn erroring_result(name: &str) -> TestResult {
    TestResult {
        spec_name: name.to_string(),
        passed: false,
        steps_run: 1,
        assertion_results: vec![],
        error: Some("Step 0 failed: Could not find link with text \"<Archive>\"".into()),
    }
}

fn mixed_suite_report() -> TestSuiteReport {
    TestSuiteReport::from_results(
        "posts",
        vec![
            passing_result("Delete a post"),
            failing_result("Cancel a delete"),
            erroring_result("Archive a post"),
        ],
    )
}

// ============================================================================
// 1. Suite report counts
// ============================================================================

#[test]
fn suite_report_counts() {
    let report = mixed_suite_report();
    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.errored, 1);
    assert_eq!(report.assertion_count(), 2);
    assert!(!report.all_passed());
}

#[test]
fn empty_suite_passes() {
    let report = TestSuiteReport::from_results("empty", vec![]);
    assert!(report.all_passed());
    assert_eq!(report.total, 0);
}

#[test]
fn duration_is_optional_in_json() {
    let report = TestSuiteReport::from_results("s", vec![passing_result("a")]);
    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("duration_ms"));

    let json = serde_json::to_string(&report.with_duration(1500)).unwrap();
    assert!(json.contains("\"duration_ms\":1500"));
}

// ============================================================================
// 2. Console
// ============================================================================

#[test]
fn console_lists_passes_failures_and_errors() {
    let out = format_console_report(&mixed_suite_report().with_duration(2500));
    assert!(out.starts_with("=== Suite: posts ==="));
    assert!(out.contains("\u{2713} PASS  Delete a post (4 steps, 1 assertions)"));
    assert!(out.contains("\u{2717} FAIL  Cancel a delete"));
    assert!(out.contains(
        "[FAIL] Step 2: popup_blocked (actual: true) A confirmation popup is still open"
    ));
    assert!(out.contains("[ERROR] Step 0 failed"));
    assert!(out.contains("=== Results: 1 passed, 2 failed (3 total) in 2.5s ==="));
}

#[test]
fn console_omits_details_for_passing_runs() {
    let report = TestSuiteReport::from_results("ok", vec![passing_result("a")]);
    let out = format_console_report(&report);
    assert!(!out.contains("[FAIL]"));
    assert!(!out.contains("[ERROR]"));
    assert!(out.ends_with("(1 total) ===\n"));
}

#[test]
fn assertion_names_match_yaml_tags() {
    let spec = AssertionSpec::FieldValue {
        field: "title".into(),
        form: None,
        expected: "x".into(),
    };
    assert_eq!(assertion_name(&spec), "field_value");

    let yaml = serde_yaml::to_string(&spec).unwrap();
    assert!(yaml.contains("type: field_value"));
}

// ============================================================================
// 3. JUnit
// ============================================================================

#[test]
fn junit_header_counts() {
    let xml = generate_junit_xml(&mixed_suite_report().with_duration(412));
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains(
        "<testsuite name=\"posts\" tests=\"3\" failures=\"1\" errors=\"1\" time=\"0.412\">"
    ));
    assert!(xml.trim_end().ends_with("</testsuite>"));
}

#[test]
fn junit_cases() {
    let xml = generate_junit_xml(&mixed_suite_report());
    assert!(xml.contains("<testcase name=\"Delete a post\" classname=\"clickthrough\" />"));
    assert!(xml.contains("<failure message=\"1 assertion(s) failed\" type=\"AssertionFailure\">"));
    assert!(xml.contains("Step 2: A confirmation popup is still open"));
    assert!(xml.contains("<error message=\"Step 0 failed: Could not find link with text &quot;&lt;Archive&gt;&quot;\""));
}

#[test]
fn escape_xml_handles_all_specials() {
    assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
}
