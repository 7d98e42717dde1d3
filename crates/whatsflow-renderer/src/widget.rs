//! Rendered widgets.
//!
//! A [`Widget`] is a screen component after rendering: bindings resolved to
//! concrete options, form state merged in, hidden and unrecognized nodes
//! dropped. Widgets are what a front end draws.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use whatsflow_flow::{Action, InputKind, SelectOption};
use whatsflow_types::ScreenId;

// ─────────────────────────────────────────────────────────────────────────────
// Answer values
// ─────────────────────────────────────────────────────────────────────────────

/// A value the user has entered into a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free text, including dates as epoch-millisecond strings.
    Text(String),
    /// An opt-in toggle.
    Flag(bool),
    /// A single chosen option id.
    Selection(String),
    /// A set of chosen option ids.
    Selections(Vec<String>),
}

impl AnswerValue {
    /// The value as JSON, the shape payload bindings resolve to.
    pub fn as_json(&self) -> Value {
        match self {
            AnswerValue::Text(text) => Value::String(text.clone()),
            AnswerValue::Flag(flag) => Value::Bool(*flag),
            AnswerValue::Selection(id) => Value::String(id.clone()),
            AnswerValue::Selections(ids) => {
                Value::Array(ids.iter().cloned().map(Value::String).collect())
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) | AnswerValue::Selection(text) => Some(text),
            _ => None,
        }
    }
}

/// Form state for one screen, field name to entered value.
pub type ScreenAnswers = HashMap<String, AnswerValue>;

// ─────────────────────────────────────────────────────────────────────────────
// Widgets
// ─────────────────────────────────────────────────────────────────────────────

/// One row of a rendered navigation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavRow {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// The screen's bottom action button.
///
/// Synthetic means the document had no footer on this screen and the button
/// was generated: "Continue" completing the flow on terminal screens,
/// "Proceed" moving to the next screen otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterButton {
    pub label: String,
    pub action: Action,
    pub synthetic: bool,
}

/// A rendered screen component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Widget {
    Heading {
        text: String,
    },
    Subheading {
        text: String,
    },
    Body {
        text: String,
        markdown: bool,
    },
    Caption {
        text: String,
    },
    RichText {
        text: String,
    },
    TextField {
        name: String,
        label: Option<String>,
        kind: InputKind,
        required: bool,
        pattern: Option<String>,
        helper_text: Option<String>,
        value: Option<String>,
    },
    TextArea {
        name: String,
        label: Option<String>,
        required: bool,
        helper_text: Option<String>,
        value: Option<String>,
    },
    CheckboxGroup {
        name: String,
        label: Option<String>,
        description: Option<String>,
        required: bool,
        options: Vec<SelectOption>,
        selected: Vec<String>,
        on_select: Option<Action>,
    },
    RadioGroup {
        name: String,
        label: Option<String>,
        description: Option<String>,
        required: bool,
        options: Vec<SelectOption>,
        selected: Option<String>,
        on_select: Option<Action>,
    },
    Dropdown {
        name: String,
        label: Option<String>,
        required: bool,
        options: Vec<SelectOption>,
        selected: Option<String>,
        on_select: Option<Action>,
    },
    ChipSelector {
        name: String,
        label: Option<String>,
        description: Option<String>,
        max_selected: Option<u32>,
        options: Vec<SelectOption>,
        selected: Vec<String>,
        on_select: Option<Action>,
    },
    DateField {
        name: String,
        label: Option<String>,
        helper_text: Option<String>,
        /// Epoch milliseconds as strings, the document's own encoding.
        min_date: Option<String>,
        max_date: Option<String>,
        unavailable: Vec<String>,
        value: Option<String>,
        on_select: Option<Action>,
    },
    OptIn {
        name: String,
        label: Option<String>,
        required: bool,
        accepted: bool,
        on_click: Option<Action>,
    },
    Link {
        text: String,
        on_click: Option<Action>,
    },
    NavList {
        name: String,
        rows: Vec<NavRow>,
    },
}

impl Widget {
    /// The form field name, for widgets that collect a value.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Widget::TextField { name, .. }
            | Widget::TextArea { name, .. }
            | Widget::CheckboxGroup { name, .. }
            | Widget::RadioGroup { name, .. }
            | Widget::Dropdown { name, .. }
            | Widget::ChipSelector { name, .. }
            | Widget::DateField { name, .. }
            | Widget::OptIn { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether the widget responds to user input.
    pub fn is_interactive(&self) -> bool {
        !matches!(
            self,
            Widget::Heading { .. }
                | Widget::Subheading { .. }
                | Widget::Body { .. }
                | Widget::Caption { .. }
                | Widget::RichText { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendered screen
// ─────────────────────────────────────────────────────────────────────────────

/// A fully rendered screen: widgets in document order plus the bottom action
/// button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedScreen {
    pub id: ScreenId,
    pub title: String,
    pub terminal: bool,
    pub widgets: Vec<Widget>,
    pub footer: FooterButton,
}

impl RenderedScreen {
    /// Look up a widget by its form field name.
    pub fn widget(&self, field: &str) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|widget| widget.field_name() == Some(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_values_as_json() {
        assert_eq!(
            AnswerValue::Text("hi".to_string()).as_json(),
            Value::String("hi".to_string())
        );
        assert_eq!(AnswerValue::Flag(true).as_json(), Value::Bool(true));
        assert_eq!(
            AnswerValue::Selections(vec!["1".to_string(), "2".to_string()]).as_json(),
            serde_json::json!(["1", "2"])
        );
    }

    #[test]
    fn test_widget_field_names() {
        let widget = Widget::TextField {
            name: "email".to_string(),
            label: None,
            kind: InputKind::Email,
            required: true,
            pattern: None,
            helper_text: None,
            value: None,
        };
        assert_eq!(widget.field_name(), Some("email"));
        assert!(widget.is_interactive());

        let heading = Widget::Heading {
            text: "Welcome".to_string(),
        };
        assert_eq!(heading.field_name(), None);
        assert!(!heading.is_interactive());
    }
}
