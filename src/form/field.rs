use serde::{Deserialize, Serialize};

use crate::dom::element::MarkupElement;
use crate::error::{DriverError, Result};

/// Kinds of form controls the page understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Password,
    Hidden,
    Textarea,
    Checkbox,
    Radio,
    Select,
    Button,
}

impl FieldKind {
    /// Controls `fills_in` may type into.
    pub const FILLABLE: &'static [FieldKind] =
        &[FieldKind::Text, FieldKind::Password, FieldKind::Textarea];

    fn from_element(element: &MarkupElement) -> Option<FieldKind> {
        match element.tag.as_str() {
            "textarea" => Some(FieldKind::Textarea),
            "select" => Some(FieldKind::Select),
            "button" => Some(FieldKind::Button),
            "input" => {
                let input_type = element.attr("type").unwrap_or("text").to_lowercase();
                match input_type.as_str() {
                    "password" => Some(FieldKind::Password),
                    "hidden" => Some(FieldKind::Hidden),
                    "checkbox" => Some(FieldKind::Checkbox),
                    "radio" => Some(FieldKind::Radio),
                    "submit" | "image" | "button" => Some(FieldKind::Button),
                    "file" | "reset" => None,
                    _ => Some(FieldKind::Text),
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub text: String,
    pub value: Option<String>,
    pub selected: bool,
}

impl SelectOption {
    /// What the option submits: its `value` attribute, else its text.
    pub fn submitted_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }
}

/// A form control and its current (possibly test-modified) state.
#[derive(Debug, Clone)]
pub struct Field {
    element: usize,
    kind: FieldKind,
    id: Option<String>,
    name: Option<String>,
    label: Option<String>,
    value: Option<String>,
    checked: bool,
    disabled: bool,
    options: Vec<SelectOption>,
}

impl Field {
    /// Build a field from its parsed element; `None` for controls that never submit.
    pub fn from_element(
        element_index: usize,
        element: &MarkupElement,
        label: Option<String>,
        options: Vec<SelectOption>,
    ) -> Option<Field> {
        let kind = FieldKind::from_element(element)?;

        let value = match kind {
            FieldKind::Textarea => Some(element.text.clone()),
            FieldKind::Select => None,
            _ => element.attr("value").map(str::to_string),
        };

        let mut options = options;
        if kind == FieldKind::Select && !options.iter().any(|o| o.selected) {
            if let Some(first) = options.first_mut() {
                first.selected = true;
            }
        }

        Some(Field {
            element: element_index,
            kind,
            id: element.attr("id").map(str::to_string),
            name: element.attr("name").map(str::to_string),
            label,
            value,
            checked: element.has_attr("checked"),
            disabled: element.has_attr("disabled"),
            options,
        })
    }

    pub(crate) fn element_index(&self) -> usize {
        self.element
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Current value as the form would see it.
    pub fn value(&self) -> Option<&str> {
        match self.kind {
            FieldKind::Select => self
                .options
                .iter()
                .find(|o| o.selected)
                .map(SelectOption::submitted_value),
            _ => self.value.as_deref(),
        }
    }

    pub fn matches_id(&self, identifier: &str) -> bool {
        self.id.as_deref() == Some(identifier)
    }

    pub fn matches_name(&self, identifier: &str) -> bool {
        self.name.as_deref() == Some(identifier)
    }

    pub fn matches_label(&self, identifier: &str) -> bool {
        let needle = identifier.to_lowercase();
        self.label
            .as_deref()
            .is_some_and(|label| label.to_lowercase().contains(&needle))
    }

    pub fn set(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }

    pub fn check(&mut self) {
        self.checked = true;
    }

    pub fn uncheck(&mut self) {
        self.checked = false;
    }

    /// Mark the option whose text contains `option_text` as the only selection.
    pub fn select_option(&mut self, option_text: &str) -> Result<()> {
        let needle = option_text.to_lowercase();
        let position = self
            .options
            .iter()
            .position(|o| o.text.to_lowercase() == needle)
            .or_else(|| {
                self.options
                    .iter()
                    .position(|o| o.text.to_lowercase().contains(&needle))
            })
            .ok_or_else(|| DriverError::Lookup(format!("Could not find option {:?}", option_text)))?;

        for (i, option) in self.options.iter_mut().enumerate() {
            option.selected = i == position;
        }
        Ok(())
    }

    pub fn has_option(&self, option_text: &str) -> bool {
        let needle = option_text.to_lowercase();
        self.options
            .iter()
            .any(|o| o.text.to_lowercase().contains(&needle))
    }

    /// Value this field contributes to a submission, if it contributes one.
    ///
    /// Buttons are excluded here; only the pressed button is sent.
    pub fn submitted_value(&self) -> Option<String> {
        if self.disabled || self.name.is_none() {
            return None;
        }
        match self.kind {
            FieldKind::Button => None,
            FieldKind::Checkbox | FieldKind::Radio => self
                .checked
                .then(|| self.value.clone().unwrap_or_else(|| "on".to_string())),
            FieldKind::Select => self.value().map(str::to_string),
            _ => Some(self.value.clone().unwrap_or_default()),
        }
    }
}
