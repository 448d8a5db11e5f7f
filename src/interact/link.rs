use url::Url;

use crate::dom::element::{ElementHandle, MarkupElement};
use crate::error::Result;
use crate::interact::inference::{confirm_message, infer_method, infer_payload};
use crate::interact::interactable::Interactable;
use crate::transport::params::Params;
use crate::transport::request::{HttpMethod, RequestIntent};

/// Where the page currently is, for resolving relative hrefs.
#[derive(Debug, Clone)]
pub struct Location {
    pub current_url: String,

    /// Host of the application under test; absolute links to it are made relative
    pub app_host: String,
}

impl Location {
    pub fn new(current_url: impl Into<String>, app_host: impl Into<String>) -> Self {
        Self {
            current_url: current_url.into(),
            app_host: app_host.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// `None` means enabled
    pub javascript: Option<bool>,

    /// Set when re-clicking after the user accepted a confirmation
    pub confirm_popup: bool,
}

impl ClickOptions {
    pub fn without_javascript() -> Self {
        Self {
            javascript: Some(false),
            confirm_popup: false,
        }
    }

    pub fn confirmed() -> Self {
        Self {
            javascript: Some(true),
            confirm_popup: true,
        }
    }
}

/// What a click on a link turns into. The page carries it out.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// In-page anchor, nothing to request
    Ignored,

    /// A `confirm()` guard must be answered before the request goes out
    Confirm { message: String, method: HttpMethod },

    Request(RequestIntent),
}

/// An `a[href]` element of the current document.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    handle: ElementHandle,
    element: &'a MarkupElement,
}

impl Interactable for Link<'_> {
    fn element(&self) -> &MarkupElement {
        self.element
    }
}

impl<'a> Link<'a> {
    pub(crate) fn new(handle: ElementHandle, element: &'a MarkupElement) -> Self {
        Self { handle, element }
    }

    pub fn handle(&self) -> ElementHandle {
        self.handle
    }

    /// Verb the link's onclick handler would really use.
    pub fn http_method(&self) -> Result<HttpMethod> {
        infer_method(self.onclick())
    }

    pub fn matches_method(&self, method: HttpMethod) -> Result<bool> {
        Ok(self.http_method()? == method)
    }

    /// Data the handler would submit along with the request.
    pub fn payload(&self) -> Params {
        infer_payload(self.onclick(), Params::new())
    }

    pub fn click(
        &self,
        method: Option<HttpMethod>,
        options: ClickOptions,
        location: &Location,
    ) -> Result<ClickOutcome> {
        let method = match method {
            Some(m) => m,
            None => self.http_method()?,
        };

        let href = self.href().unwrap_or_default();
        if href.starts_with('#') && method == HttpMethod::Get {
            return Ok(ClickOutcome::Ignored);
        }

        if !options.javascript.unwrap_or(true) {
            let intent = RequestIntent::new(self.absolute_href(location), HttpMethod::Get, Params::new())
                .with_javascript(false);
            return Ok(ClickOutcome::Request(intent));
        }

        if !options.confirm_popup {
            if let Some(message) = confirm_message(self.onclick()) {
                return Ok(ClickOutcome::Confirm { message, method });
            }
        }

        Ok(ClickOutcome::Request(RequestIntent::new(
            self.absolute_href(location),
            method,
            self.payload(),
        )))
    }

    /// The href as a path the transport can request.
    pub fn absolute_href(&self, location: &Location) -> String {
        resolve_href(self.href().unwrap_or_default(), location)
    }
}

pub fn resolve_href(href: &str, location: &Location) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return match Url::parse(href) {
            Ok(url) if url.host_str() == Some(location.app_host.as_str()) => strip_origin(href),
            _ => href.to_string(),
        };
    }

    if href.starts_with('?') {
        format!("{}{}", location.current_url, href)
    } else if !href.starts_with('/') {
        format!("{}/{}", location.current_url, href)
    } else {
        href.to_string()
    }
}

/// Everything after the authority, exactly as written in the markup.
fn strip_origin(href: &str) -> String {
    let rest = href.split_once("://").map_or(href, |(_, rest)| rest);
    let tail = rest
        .find(['/', '?', '#'])
        .map_or("", |start| &rest[start..]);
    if tail.starts_with('/') {
        tail.to_string()
    } else {
        format!("/{}", tail)
    }
}
