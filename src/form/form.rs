use crate::dom::document::Document;
use crate::dom::element::{ElementHandle, MarkupElement};
use crate::error::{DriverError, Result};
use crate::form::field::{Field, FieldKind};
use crate::interact::inference::confirm_message;
use crate::interact::interactable::{Interactable, normalize_text};
use crate::transport::params::Params;
use crate::transport::request::{HttpMethod, RequestIntent};

/// The fields of one `<form>`, stored in the document.
#[derive(Debug, Clone)]
pub struct FormNode {
    element: usize,
    fields: Vec<Field>,
}

impl FormNode {
    pub(crate) fn new(element: usize, fields: Vec<Field>) -> Self {
        Self { element, fields }
    }

    pub(crate) fn element(&self) -> usize {
        self.element
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position of a field by id, then name, then label text.
    ///
    /// `kinds` restricts the candidates (empty means any kind). Without an
    /// identifier the first candidate is returned.
    pub fn locate(&self, identifier: Option<&str>, kinds: &[FieldKind]) -> Option<usize> {
        let fields = &self.fields;
        let candidates = move || {
            fields
                .iter()
                .enumerate()
                .filter(move |(_, f)| kinds.is_empty() || kinds.contains(&f.kind()))
        };

        let Some(identifier) = identifier else {
            return candidates().map(|(i, _)| i).next();
        };

        candidates()
            .find(|(_, f)| f.matches_id(identifier))
            .or_else(|| candidates().find(|(_, f)| f.matches_name(identifier)))
            .or_else(|| candidates().find(|(_, f)| f.matches_label(identifier)))
            .map(|(i, _)| i)
    }

    pub(crate) fn field_mut(&mut self, position: usize) -> Option<&mut Field> {
        self.fields.get_mut(position)
    }

    /// Check the radio at `position` and clear the rest of its group.
    pub(crate) fn choose(&mut self, position: usize) {
        let group = self.fields.get(position).and_then(|f| f.name().map(str::to_string));
        for (i, field) in self.fields.iter_mut().enumerate() {
            if field.kind() != FieldKind::Radio {
                continue;
            }
            if i == position {
                field.check();
            } else if group.is_some() && field.name() == group.as_deref() {
                field.uncheck();
            }
        }
    }
}

/// A submit control inside a form.
#[derive(Debug, Clone, Copy)]
pub struct Button<'a> {
    handle: ElementHandle,
    field: &'a Field,
    element: &'a MarkupElement,
}

impl Interactable for Button<'_> {
    fn element(&self) -> &MarkupElement {
        self.element
    }

    fn text(&self) -> String {
        if self.element.tag == "button" {
            normalize_text(&self.element.inner_html)
        } else {
            self.element.attr("value").unwrap_or_default().to_string()
        }
    }
}

impl<'a> Button<'a> {
    pub fn handle(&self) -> ElementHandle {
        self.handle
    }

    pub fn field(&self) -> &'a Field {
        self.field
    }

    pub fn matches(&self, label: &str) -> bool {
        self.matches_text(label) || self.field.matches_id(label) || self.field.matches_name(label)
    }
}

/// Read-only view of a form in the current document.
#[derive(Debug, Clone, Copy)]
pub struct Form<'a> {
    handle: ElementHandle,
    element: &'a MarkupElement,
    node: &'a FormNode,
    doc: &'a Document,
}

impl<'a> Form<'a> {
    pub(crate) fn new(
        handle: ElementHandle,
        element: &'a MarkupElement,
        node: &'a FormNode,
        doc: &'a Document,
    ) -> Self {
        Self {
            handle,
            element,
            node,
            doc,
        }
    }

    pub fn handle(&self) -> ElementHandle {
        self.handle
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.attr("id")
    }

    pub fn node(&self) -> &'a FormNode {
        self.node
    }

    pub fn fields(&self) -> &'a [Field] {
        self.node.fields()
    }

    /// `action` attribute, falling back to the page the form is on.
    pub fn action(&self, current_url: &str) -> String {
        match self.element.attr("action") {
            Some(action) if !action.trim().is_empty() => action.to_string(),
            _ => current_url.to_string(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.element
            .attr("method")
            .and_then(|m| m.parse().ok())
            .unwrap_or(HttpMethod::Get)
    }

    pub fn onsubmit(&self) -> Option<&'a str> {
        self.element.attr("onsubmit")
    }

    /// Message of a `confirm()` guard in the form's onsubmit handler.
    pub fn confirm_message(&self) -> Option<String> {
        confirm_message(self.onsubmit())
    }

    pub fn find_field(&self, identifier: Option<&str>, kinds: &[FieldKind]) -> Option<&'a Field> {
        self.node
            .locate(identifier, kinds)
            .map(|position| &self.node.fields()[position])
    }

    pub fn buttons(&self) -> impl Iterator<Item = Button<'a>> + 'a {
        let doc = self.doc;
        self.node
            .fields()
            .iter()
            .filter(|f| f.kind() == FieldKind::Button)
            .map(move |field| Button {
                handle: ElementHandle::new(doc.generation(), field.element_index()),
                field,
                element: doc.element_at(field.element_index()),
            })
    }

    /// The first button matching `label`, or the first button at all.
    pub fn find_button(&self, label: Option<&str>) -> Option<Button<'a>> {
        let mut buttons = self.buttons();
        match label {
            Some(label) => buttons.find(|b| b.matches(label)),
            None => buttons.next(),
        }
    }

    pub fn button(&self, handle: ElementHandle) -> Result<Button<'a>> {
        self.doc.element(handle)?;
        self.buttons()
            .find(|b| b.handle == handle)
            .ok_or_else(|| DriverError::Lookup(format!("Element {} is not a button of this form", handle)))
    }

    /// Parameters a submission sends, in document order.
    pub fn params(&self, pressed: Option<&Button<'_>>) -> Params {
        let mut params = Params::new();
        for field in self.node.fields() {
            if let (Some(name), Some(value)) = (field.name(), field.submitted_value()) {
                params.insert_field(name, value);
            }
        }
        if let Some(button) = pressed {
            if let Some(name) = button.field.name() {
                params.insert_field(name, button.element.attr("value").unwrap_or_default());
            }
        }
        params
    }

    pub fn submission(&self, pressed: Option<&Button<'_>>, current_url: &str) -> RequestIntent {
        RequestIntent::new(self.action(current_url), self.method(), self.params(pressed))
    }
}
