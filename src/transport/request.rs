use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::transport::params::Params;

/// HTTP verbs a test can issue through the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// A fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestIntent {
    pub url: String,
    pub method: HttpMethod,
    pub payload: Params,
    pub javascript_enabled: bool,
}

impl RequestIntent {
    pub fn new(url: impl Into<String>, method: HttpMethod, payload: Params) -> Self {
        Self {
            url: url.into(),
            method,
            payload,
            javascript_enabled: true,
        }
    }

    pub fn with_javascript(mut self, enabled: bool) -> Self {
        self.javascript_enabled = enabled;
        self
    }

    /// True when `other` would hit the server with the same verb, URL and data.
    pub fn same_request(&self, other: &RequestIntent) -> bool {
        self.url == other.url && self.method == other.method && self.payload == other.payload
    }
}

/// What came back from the application after redirects were followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,

    /// Final URL after redirects, when the transport knows it
    #[serde(default)]
    pub url: Option<String>,

    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            url: None,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            url: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
