use serde::{Deserialize, Serialize};

/// What happens to a pending confirmation when the page navigates anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AbandonedConfirmation {
    /// Drop it with a warning and carry on with the navigation
    #[default]
    Discard,

    /// Refuse the navigation with an `IllegalState` error
    Fail,
}

/// Behaviour of a `Page` within one test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Host whose absolute links are treated as in-app paths
    #[serde(default = "default_app_host")]
    pub app_host: String,

    /// Whether clicks honour onclick handlers by default
    #[serde(default = "default_true")]
    pub javascript: bool,

    /// Body text that marks a server-side exception page
    #[serde(default = "default_exception_marker")]
    pub exception_marker: String,

    #[serde(default)]
    pub abandoned_confirmation: AbandonedConfirmation,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// JSONL file to record requests and popup transitions in
    #[serde(default)]
    pub trace_file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_host: default_app_host(),
            javascript: true,
            exception_marker: default_exception_marker(),
            abandoned_confirmation: AbandonedConfirmation::default(),
            snapshot: SnapshotConfig::default(),
            trace_file: None,
        }
    }
}

impl SessionConfig {
    pub fn with_app_host(mut self, host: &str) -> Self {
        self.app_host = host.to_string();
        self
    }

    pub fn with_javascript(mut self, enabled: bool) -> Self {
        self.javascript = enabled;
        self
    }

    pub fn with_abandoned_confirmation(mut self, policy: AbandonedConfirmation) -> Self {
        self.abandoned_confirmation = policy;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: Option<&str>) -> Self {
        self.snapshot.dir = dir.map(str::to_string);
        self
    }
}

/// Where anomalous responses are dumped for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Directory to write into; nothing is written when it does not exist
    #[serde(default = "default_snapshot_dir")]
    pub dir: Option<String>,

    /// Program to open a written snapshot with (e.g. `open`, `xdg-open`)
    #[serde(default)]
    pub open_command: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
            open_command: None,
        }
    }
}

// Serde default helpers
fn default_app_host() -> String { "www.example.com".to_string() }
fn default_true() -> bool { true }
fn default_exception_marker() -> String { "Exception caught".to_string() }
fn default_snapshot_dir() -> Option<String> { Some("tmp".to_string()) }
