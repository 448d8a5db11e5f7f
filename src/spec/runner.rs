use tracing::debug;

use crate::error::{DriverError, Result};
use crate::interact::link::ClickOptions;
use crate::page::page::Page;
use crate::spec::context::TestContext;
use crate::spec::spec_model::{AssertionResult, AssertionSpec, TestResult, TestSpec, TestStep};
use crate::transport::Transport;
use crate::transport::params::Params;
use crate::transport::request::HttpMethod;

/// Executes a TestSpec step-by-step against a `Page`.
pub struct TestRunner;

impl TestRunner {
    /// Run a complete spec. The first failing step aborts the run; assertion
    /// failures are collected and do not.
    pub fn run<T: Transport>(spec: &TestSpec, page: &mut Page<T>) -> TestResult {
        let mut ctx = TestContext::new();

        if let Err(e) = page.request_page(&spec.start_url, HttpMethod::Get, Params::new()) {
            let error = format!("Failed to load start_url: {}", e);
            return ctx.finish(&spec.name, 0, Some(error));
        }

        for (i, step) in spec.steps.iter().enumerate() {
            ctx.current_step = i;
            debug!("step {}: {:?}", i, step);

            if let Err(e) = Self::execute_step(step, i, page, &mut ctx) {
                return ctx.finish(&spec.name, i + 1, Some(format!("Step {} failed: {}", i, e)));
            }
        }

        ctx.finish(&spec.name, spec.steps.len(), None)
    }

    fn execute_step<T: Transport>(
        step: &TestStep,
        step_index: usize,
        page: &mut Page<T>,
        ctx: &mut TestContext,
    ) -> Result<()> {
        match step {
            TestStep::Visit { url, method, params } => page.request_page(url, *method, params.clone()),

            TestStep::ClickLink {
                text,
                method,
                javascript,
            } => {
                let handle = page.find_link(text)?.handle();
                let options = ClickOptions {
                    javascript: javascript.or(Some(page.config().javascript)),
                    confirm_popup: false,
                };
                page.click_link(handle, *method, options)
            }

            TestStep::FillIn { field, value } => page.fills_in(field, value),

            TestStep::Check { field } => page.checks(field),

            TestStep::Uncheck { field } => page.unchecks(field),

            TestStep::Choose { field } => page.chooses(field),

            TestStep::Select { option, from } => page.selects(option, from.as_deref()),

            TestStep::ClickButton { label } => page.clicks_button(label.as_deref()),

            TestStep::SubmitForm { form } => page.submits_form(form.as_deref()),

            TestStep::DismissPopup { button } => page.dismiss_popup(button),

            TestStep::Reload => page.reloads(),

            TestStep::Assert { assertions } => {
                let results = assertions
                    .iter()
                    .map(|spec| Self::evaluate_one(spec, step_index, page))
                    .collect();
                ctx.record_assertions(results);
                Ok(())
            }
        }
    }

    /// Evaluate a single assertion.
    fn evaluate_one<T: Transport>(
        spec: &AssertionSpec,
        step_index: usize,
        page: &Page<T>,
    ) -> AssertionResult {
        let outcome = match spec {
            AssertionSpec::UrlEquals { expected } => {
                let url = page.current_url();
                Check::new(url == expected, url, || format!("URL does not equal '{}'", expected))
            }

            AssertionSpec::UrlContains { expected } => {
                let url = page.current_url();
                Check::new(url.contains(expected.as_str()), url, || {
                    format!("URL does not contain '{}'", expected)
                })
            }

            AssertionSpec::TextPresent { expected } => match page.document() {
                Ok(doc) => {
                    let found = doc.text().to_lowercase().contains(&expected.to_lowercase());
                    Check::new(found, &format!("(page text, {} chars)", doc.text().len()), || {
                        format!("Text '{}' not found on page", expected)
                    })
                }
                Err(e) => Check::error(e),
            },

            AssertionSpec::TextAbsent { expected } => match page.document() {
                Ok(doc) => {
                    let found = doc.text().to_lowercase().contains(&expected.to_lowercase());
                    Check::new(!found, &format!("(page text, {} chars)", doc.text().len()), || {
                        format!("Text '{}' was found on page but should be absent", expected)
                    })
                }
                Err(e) => Check::error(e),
            },

            AssertionSpec::PopupBlocked { expected } => {
                let blocked = page.is_blocked();
                Check::new(blocked == *expected, &blocked.to_string(), || {
                    if *expected {
                        "No confirmation popup is open".to_string()
                    } else {
                        "A confirmation popup is still open".to_string()
                    }
                })
            }

            AssertionSpec::PopupMessage { expected } => match page.popup_message() {
                Some(message) => Check::new(message == expected, message, || {
                    format!("Popup message is not '{}'", expected)
                }),
                None => Check::missing("No confirmation popup is open"),
            },

            AssertionSpec::LinkPresent { text } => match page.find_link(text) {
                Ok(link) => Check::new(true, &link.absolute_href(&page.location()), String::new),
                Err(e) => Check::error(e),
            },

            AssertionSpec::FieldValue {
                field,
                form,
                expected,
            } => match page.field_value(field, form.as_deref()) {
                Ok(value) => {
                    let actual = value.unwrap_or_default();
                    Check::new(actual == *expected, &actual, || {
                        format!("Field '{}' has value '{}', expected '{}'", field, actual, expected)
                    })
                }
                Err(e) => Check::error(e),
            },
        };

        AssertionResult {
            step_index,
            spec: spec.clone(),
            passed: outcome.passed,
            actual: outcome.actual,
            message: outcome.message,
        }
    }
}

/// Outcome of one assertion before it is tied to its step.
struct Check {
    passed: bool,
    actual: Option<String>,
    message: Option<String>,
}

impl Check {
    fn new(passed: bool, actual: &str, failure: impl FnOnce() -> String) -> Self {
        Check {
            passed,
            actual: Some(actual.to_string()),
            message: if passed { None } else { Some(failure()) },
        }
    }

    fn missing(message: &str) -> Self {
        Check {
            passed: false,
            actual: None,
            message: Some(message.to_string()),
        }
    }

    fn error(e: DriverError) -> Self {
        Check {
            passed: false,
            actual: None,
            message: Some(e.to_string()),
        }
    }
}
