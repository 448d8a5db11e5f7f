use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::dom::element::{ElementHandle, MarkupElement};
use crate::error::{DriverError, Result};
use crate::form::field::{Field, SelectOption};
use crate::form::form::{Form, FormNode};
use crate::interact::link::Link;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));
static FORM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| css("form"));
static CONTROL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| css("input, textarea, select, button"));
static OPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| css("option"));
static LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| css("label[for]"));

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

/// A parsed response body.
///
/// Elements the page can interact with are copied into an arena; links and
/// forms refer to them by index. Field state (typed values, checked boxes)
/// lives here too, so it is discarded together with the document when the
/// page navigates.
#[derive(Debug, Clone)]
pub struct Document {
    generation: u64,
    elements: Vec<MarkupElement>,
    links: Vec<usize>,
    forms: Vec<FormNode>,
    text: String,
}

impl Document {
    pub fn parse(body: &str, generation: u64) -> Self {
        let html = Html::parse_document(body);
        let labels = collect_labels(&html);

        let mut doc = Document {
            generation,
            elements: Vec::new(),
            links: Vec::new(),
            forms: Vec::new(),
            text: visible_text(&html),
        };

        for anchor in html.select(&LINK_SELECTOR) {
            let index = doc.push(anchor);
            doc.links.push(index);
        }

        let form_refs: Vec<ElementRef<'_>> = html.select(&FORM_SELECTOR).collect();
        let form_elements: Vec<usize> = form_refs.iter().map(|form| doc.push(*form)).collect();
        let mut form_fields: Vec<Vec<Field>> = vec![Vec::new(); form_refs.len()];

        // Controls are walked in source order so a form emptied by table
        // markup can pick up the controls that followed it.
        let mut table_form = None;
        for node in html.root_element().descendants().filter_map(ElementRef::wrap) {
            if let Some(position) = form_refs.iter().position(|form| form.id() == node.id()) {
                table_form = is_table_form(node).then_some(position);
                continue;
            }
            if !CONTROL_SELECTOR.matches(&node) {
                continue;
            }

            let owner = match node.value().attr("form") {
                Some(id) => form_refs.iter().position(|form| form.value().id() == Some(id)),
                None => enclosing_form(node, &form_refs).or(table_form),
            };
            let Some(owner) = owner else {
                continue;
            };

            let label = label_for(node, &labels);
            let options = if node.value().name() == "select" {
                node.select(&OPTION_SELECTOR)
                    .map(|option| SelectOption {
                        text: collapse_whitespace(&option.text().collect::<String>()),
                        value: option.value().attr("value").map(str::to_string),
                        selected: option.value().attr("selected").is_some(),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let index = doc.push(node);
            if let Some(field) = Field::from_element(index, &doc.elements[index], label, options) {
                form_fields[owner].push(field);
            }
        }

        for (element, fields) in form_elements.into_iter().zip(form_fields) {
            doc.forms.push(FormNode::new(element, fields));
        }

        doc
    }

    fn push(&mut self, element: ElementRef<'_>) -> usize {
        let attrs: HashMap<String, String> = element
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let snapshot = MarkupElement::new(element.value().name(), attrs)
            .with_content(element.inner_html(), element.text().collect::<String>());
        self.elements.push(snapshot);
        self.elements.len() - 1
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whitespace-collapsed text of the whole page.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn handle(&self, index: usize) -> ElementHandle {
        ElementHandle::new(self.generation, index)
    }

    fn check(&self, handle: ElementHandle) -> Result<usize> {
        if handle.generation() != self.generation {
            return Err(DriverError::StaleHandle {
                handle_generation: handle.generation(),
                current_generation: self.generation,
            });
        }
        if handle.index() >= self.elements.len() {
            return Err(DriverError::Lookup(format!("No element {} on this page", handle)));
        }
        Ok(handle.index())
    }

    pub fn element(&self, handle: ElementHandle) -> Result<&MarkupElement> {
        let index = self.check(handle)?;
        Ok(&self.elements[index])
    }

    pub(crate) fn element_at(&self, index: usize) -> &MarkupElement {
        &self.elements[index]
    }

    // ------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------

    /// All `a[href]` elements in document order.
    pub fn links(&self) -> impl Iterator<Item = Link<'_>> + '_ {
        self.links
            .iter()
            .map(|&index| Link::new(self.handle(index), &self.elements[index]))
    }

    pub fn link(&self, handle: ElementHandle) -> Result<Link<'_>> {
        let index = self.check(handle)?;
        if !self.links.contains(&index) {
            return Err(DriverError::Lookup(format!("Element {} is not a link", handle)));
        }
        Ok(Link::new(handle, &self.elements[index]))
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    pub fn forms(&self) -> impl Iterator<Item = Form<'_>> + '_ {
        self.forms.iter().map(|node| self.form_view(node))
    }

    fn form_view<'a>(&'a self, node: &'a FormNode) -> Form<'a> {
        Form::new(self.handle(node.element()), &self.elements[node.element()], node, self)
    }

    pub fn form(&self, handle: ElementHandle) -> Result<Form<'_>> {
        let index = self.check(handle)?;
        self.forms
            .iter()
            .find(|node| node.element() == index)
            .map(|node| self.form_view(node))
            .ok_or_else(|| DriverError::Lookup(format!("Element {} is not a form", handle)))
    }

    /// The form with the given id, or the first form when `id` is `None`.
    pub fn find_form(&self, id: Option<&str>) -> Result<Form<'_>> {
        match id {
            Some(id) => self
                .forms()
                .find(|form| form.id() == Some(id))
                .ok_or_else(|| DriverError::Lookup(format!("Could not find form with id {:?}", id))),
            None => self
                .forms()
                .next()
                .ok_or_else(|| DriverError::Lookup("Could not find a form on the page".into())),
        }
    }

    pub(crate) fn form_node_mut(&mut self, handle: ElementHandle) -> Result<&mut FormNode> {
        let index = self.check(handle)?;
        self.forms
            .iter_mut()
            .find(|node| node.element() == index)
            .ok_or_else(|| DriverError::Lookup(format!("Element {} is not a form", handle)))
    }
}

/// Page text, leaving out script and style source.
fn visible_text(html: &Html) -> String {
    let chunks: Vec<&str> = html
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap);
            if parent.is_some_and(|p| matches!(p.value().name(), "script" | "style")) {
                return None;
            }
            Some(&**text)
        })
        .collect();
    collapse_whitespace(&chunks.join(" "))
}

fn enclosing_form(control: ElementRef<'_>, forms: &[ElementRef<'_>]) -> Option<usize> {
    let form = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "form")?;
    forms.iter().position(|f| f.id() == form.id())
}

/// A `<form>` opened directly inside table markup is closed straight away by
/// the parser, leaving it empty and its controls outside it.
fn is_table_form(form: ElementRef<'_>) -> bool {
    let in_table = form
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| matches!(parent.value().name(), "table" | "tbody" | "thead" | "tfoot" | "tr"));
    in_table && form.select(&CONTROL_SELECTOR).next().is_none()
}

/// `<label for="x">` text keyed by the target id.
fn collect_labels(html: &Html) -> HashMap<String, String> {
    html.select(&LABEL_SELECTOR)
        .filter_map(|label| {
            let target = label.value().attr("for")?;
            Some((target.to_string(), collapse_whitespace(&label.text().collect::<String>())))
        })
        .collect()
}

fn label_for(control: ElementRef<'_>, labels: &HashMap<String, String>) -> Option<String> {
    if let Some(text) = control.value().attr("id").and_then(|id| labels.get(id)) {
        return Some(text.clone());
    }
    control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "label")
        .map(|label| collapse_whitespace(&label.text().collect::<String>()))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
