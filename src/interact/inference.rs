use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DriverError, Result};
use crate::transport::params::Params;
use crate::transport::request::HttpMethod;

// ============================================================================
// Known onclick idioms
// ============================================================================
//
// Server-side link helpers turn `:method => :delete` into an onclick handler
// that builds a hidden form and submits it, and remote links into an inline
// `new Ajax.Request(..., {method:'put'})` call. Nothing here runs JavaScript:
// the handler text is matched against the exact snippets those helpers emit.

const FORM_SUBMIT: &str = "f.submit()";
const AJAX_REQUEST: &str = "Ajax.Request";

static METHOD_PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"m\.setAttribute\('name',\s*'_method'\)"));
static METHOD_PARAM_VALUE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"m\.setAttribute\('value',\s*'([^']*)'\)"));
static AJAX_METHOD: LazyLock<Regex> = LazyLock::new(|| pattern(r"method:'([^']*)'"));
static TOKEN_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"s\.setAttribute\('name',\s*'authenticity_token'\)"));
static TOKEN_VALUE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"s\.setAttribute\('value',\s*'([a-f0-9]{40})'\)"));
static CONFIRM: LazyLock<Regex> = LazyLock::new(|| pattern(r#"(?i)confirm\(['"](.*?)['"]\)"#));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static idiom pattern must compile")
}

/// One recognized handler shape and how to read a verb out of it.
pub struct Idiom {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
    pub resolve: fn(&str) -> Result<HttpMethod>,
}

/// Checked in order; the first idiom that applies decides the verb.
pub static IDIOMS: [Idiom; 3] = [
    Idiom {
        name: "_method param",
        applies: is_method_override,
        resolve: method_from_override,
    },
    Idiom {
        name: "Ajax.Request",
        applies: is_ajax_request,
        resolve: method_from_ajax_options,
    },
    Idiom {
        name: "form submit",
        applies: is_form_submit,
        resolve: always_post,
    },
];

fn is_method_override(js: &str) -> bool {
    (is_form_submit(js) || is_ajax_request(js)) && METHOD_PARAM_NAME.is_match(js)
}

fn is_ajax_request(js: &str) -> bool {
    js.contains(AJAX_REQUEST)
}

fn is_form_submit(js: &str) -> bool {
    js.contains(FORM_SUBMIT)
}

fn method_from_override(js: &str) -> Result<HttpMethod> {
    let Some(caps) = METHOD_PARAM_VALUE.captures(js) else {
        return Ok(HttpMethod::Post);
    };
    match &caps[1] {
        "delete" => Ok(HttpMethod::Delete),
        "put" => Ok(HttpMethod::Put),
        _ => Err(DriverError::MethodInference {
            idiom: "_method param",
            onclick: js.to_string(),
        }),
    }
}

fn method_from_ajax_options(js: &str) -> Result<HttpMethod> {
    let verb = AJAX_METHOD.captures(js).map(|caps| caps[1].to_string());
    match verb.as_deref() {
        Some("delete") => Ok(HttpMethod::Delete),
        Some("post") => Ok(HttpMethod::Post),
        Some("put") => Ok(HttpMethod::Put),
        _ => Err(DriverError::MethodInference {
            idiom: "method param",
            onclick: js.to_string(),
        }),
    }
}

fn always_post(_js: &str) -> Result<HttpMethod> {
    Ok(HttpMethod::Post)
}

// ============================================================================
// Public inference API
// ============================================================================

/// The idiom an onclick handler matches, if any.
pub fn matching_idiom(onclick: Option<&str>) -> Option<&'static Idiom> {
    let js = onclick.filter(|js| !js.trim().is_empty())?;
    IDIOMS.iter().find(|idiom| (idiom.applies)(js))
}

/// HTTP verb a click on an element with this onclick handler really issues.
pub fn infer_method(onclick: Option<&str>) -> Result<HttpMethod> {
    match (matching_idiom(onclick), onclick) {
        (Some(idiom), Some(js)) => (idiom.resolve)(js),
        _ => Ok(HttpMethod::Get),
    }
}

/// `base` plus whatever the handler injects; currently only a CSRF token.
pub fn infer_payload(onclick: Option<&str>, mut base: Params) -> Params {
    if let Some(token) = onclick.and_then(authenticity_token) {
        base.insert("authenticity_token", token);
    }
    base
}

/// CSRF token the handler injects into its hidden form, if any.
pub fn authenticity_token(js: &str) -> Option<String> {
    if !TOKEN_NAME.is_match(js) {
        return None;
    }
    TOKEN_VALUE.captures(js).map(|caps| caps[1].to_string())
}

/// Message of a `confirm('...')` guard in a handler, if any.
pub fn confirm_message(js: Option<&str>) -> Option<String> {
    CONFIRM
        .captures(js?)
        .map(|caps| caps[1].to_string())
}
