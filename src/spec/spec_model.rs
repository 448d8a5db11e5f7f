use serde::{Deserialize, Serialize};

use crate::transport::params::Params;
use crate::transport::request::HttpMethod;

/// A scripted browsing session, usually loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestSpec {
    /// Human-readable name for this test
    pub name: String,

    /// Path requested before the first step
    pub start_url: String,

    /// Ordered list of test steps to execute
    pub steps: Vec<TestStep>,
}

/// A single step in a test spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Request a path directly
    Visit {
        url: String,
        #[serde(default)]
        method: HttpMethod,
        #[serde(default)]
        params: Params,
    },

    /// Click a link by its text; `method` overrides the inferred verb
    ClickLink {
        text: String,
        #[serde(default)]
        method: Option<HttpMethod>,
        #[serde(default)]
        javascript: Option<bool>,
    },

    FillIn {
        field: String,
        value: String,
    },

    Check {
        field: String,
    },

    Uncheck {
        field: String,
    },

    Choose {
        field: String,
    },

    Select {
        option: String,
        #[serde(default)]
        from: Option<String>,
    },

    ClickButton {
        #[serde(default)]
        label: Option<String>,
    },

    SubmitForm {
        #[serde(default)]
        form: Option<String>,
    },

    /// Answer the open confirmation: "OK" or "CANCEL"
    DismissPopup {
        button: String,
    },

    Reload,

    /// Run assertions against the current page state
    Assert {
        assertions: Vec<AssertionSpec>,
    },
}

/// A single assertion to evaluate against the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssertionSpec {
    UrlEquals { expected: String },

    UrlContains { expected: String },

    /// Page text contains the expected string (case-insensitive)
    TextPresent { expected: String },

    TextAbsent { expected: String },

    /// Whether a confirmation popup is waiting for an answer
    PopupBlocked { expected: bool },

    PopupMessage { expected: String },

    /// A link whose text or title contains `text` exists
    LinkPresent { text: String },

    FieldValue {
        field: String,
        #[serde(default)]
        form: Option<String>,
        expected: String,
    },
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    pub spec: AssertionSpec,

    pub passed: bool,

    /// Actual value found (for debugging failed assertions)
    pub actual: Option<String>,

    pub message: Option<String>,
}

/// Result of running a complete test spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub spec_name: String,

    /// Whether all steps and assertions passed
    pub passed: bool,

    pub steps_run: usize,

    pub assertion_results: Vec<AssertionResult>,

    /// Error that aborted the run, as opposed to a failed assertion
    pub error: Option<String>,
}
