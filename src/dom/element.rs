use std::collections::HashMap;
use std::fmt;

/// An owned snapshot of one parsed element.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub tag: String,
    attrs: HashMap<String, String>,
    pub inner_html: String,
    pub text: String,
}

impl MarkupElement {
    pub fn new(tag: impl Into<String>, attrs: HashMap<String, String>) -> Self {
        Self {
            tag: tag.into(),
            attrs,
            inner_html: String::new(),
            text: String::new(),
        }
    }

    pub fn with_content(mut self, inner_html: impl Into<String>, text: impl Into<String>) -> Self {
        self.inner_html = inner_html.into();
        self.text = text.into();
        self
    }

    /// Attribute value, `None` when the attribute is absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }
}

/// Points at an element of one specific parse of the page.
///
/// The generation ties the handle to the document it came from; once the page
/// navigates, the document is re-parsed under a new generation and old
/// handles are rejected instead of silently pointing at unrelated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    generation: u64,
    index: usize,
}

impl ElementHandle {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}
