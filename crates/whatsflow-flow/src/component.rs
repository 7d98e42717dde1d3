//! Layout component vocabulary.
//!
//! Components carry their wire names verbatim: the `type` tag is the
//! PascalCase component name and multi-word fields are kebab-case
//! (`on-click-action`, `data-source`). Unknown component types are kept as
//! raw JSON so a document drafted against a newer flow version still loads
//! and serializes back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::Action;
use crate::binding::Binding;

// ─────────────────────────────────────────────────────────────────────────────
// Text values
// ─────────────────────────────────────────────────────────────────────────────

/// Text content - a single string or a list of lines.
///
/// `RichText` uses the list form for multi-line markdown; the plain text
/// components almost always use the single form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Single(String),
    Lines(Vec<String>),
}

impl TextValue {
    /// Collapse to a single string, joining lines with newlines.
    pub fn to_text(&self) -> String {
        match self {
            TextValue::Single(text) => text.clone(),
            TextValue::Lines(lines) => lines.join("\n"),
        }
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        TextValue::Single(value.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Select options
// ─────────────────────────────────────────────────────────────────────────────

/// One selectable entry in a checkbox group, radio group, dropdown, or chip
/// selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            metadata: None,
        }
    }
}

/// Where a selection component gets its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataSource {
    /// A `${data.key}` binding resolved against the screen's data object.
    Binding(String),
    /// Options written directly into the component.
    Inline(Vec<SelectOption>),
}

impl DataSource {
    /// The parsed binding, when this source is a binding expression.
    pub fn as_binding(&self) -> Option<Binding> {
        match self {
            DataSource::Binding(raw) => Binding::parse(raw),
            DataSource::Inline(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The `input-type` of a text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Email,
    Password,
    Passcode,
    Phone,
    /// Any other input type name.
    #[serde(untagged)]
    Other(String),
}

impl InputKind {
    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Passcode => "passcode",
            InputKind::Phone => "phone",
            InputKind::Other(name) => name,
        }
    }

    /// True for inputs whose entered value should be masked when displayed.
    pub fn is_concealed(&self) -> bool {
        matches!(self, InputKind::Password | InputKind::Passcode)
    }
}

impl Default for InputKind {
    fn default() -> Self {
        InputKind::Text
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation list items
// ─────────────────────────────────────────────────────────────────────────────

/// Primary content of a navigation list row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// Trailing content of a navigation list row, typically a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemEnd {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One row in a `NavigationList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListItem {
    pub id: String,
    pub main_content: ListItemContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<ListItemEnd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click_action: Option<Action>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Components
// ─────────────────────────────────────────────────────────────────────────────

/// A node in a screen layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "kebab-case")]
pub enum Component {
    TextHeading {
        text: TextValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    TextSubheading {
        text: TextValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    TextBody {
        text: TextValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        markdown: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    TextCaption {
        text: TextValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    RichText {
        text: TextValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    /// Groups form fields and carries their initial values. Nested children
    /// render inline with the rest of the screen.
    Form {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        init_values: Option<Map<String, Value>>,
        #[serde(default)]
        children: Vec<LayoutChild>,
    },
    TextInput {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        input_type: Option<InputKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        helper_text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    TextArea {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        helper_text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    CheckboxGroup {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data_source: Option<DataSource>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    RadioButtonsGroup {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data_source: Option<DataSource>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    Dropdown {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data_source: Option<DataSource>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    ChipsSelector {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_selected_items: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data_source: Option<DataSource>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    DatePicker {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        helper_text: Option<String>,
        /// Epoch milliseconds as a string.
        #[serde(skip_serializing_if = "Option::is_none")]
        min_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unavailable_dates: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    /// Full-calendar variant of the date picker. Same fields, distinct wire
    /// type, kept separate so documents round-trip with their original tag.
    CalendarPicker {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        helper_text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unavailable_dates: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_select_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    OptIn {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_click_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    EmbeddedLink {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_click_action: Option<Action>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    NavigationList {
        name: String,
        #[serde(default)]
        list_items: Vec<ListItem>,
        #[serde(skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    Footer {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_click_action: Option<Action>,
    },
}

impl Component {
    /// The wire name of the component type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Component::TextHeading { .. } => "TextHeading",
            Component::TextSubheading { .. } => "TextSubheading",
            Component::TextBody { .. } => "TextBody",
            Component::TextCaption { .. } => "TextCaption",
            Component::RichText { .. } => "RichText",
            Component::Form { .. } => "Form",
            Component::TextInput { .. } => "TextInput",
            Component::TextArea { .. } => "TextArea",
            Component::CheckboxGroup { .. } => "CheckboxGroup",
            Component::RadioButtonsGroup { .. } => "RadioButtonsGroup",
            Component::Dropdown { .. } => "Dropdown",
            Component::ChipsSelector { .. } => "ChipsSelector",
            Component::DatePicker { .. } => "DatePicker",
            Component::CalendarPicker { .. } => "CalendarPicker",
            Component::OptIn { .. } => "OptIn",
            Component::EmbeddedLink { .. } => "EmbeddedLink",
            Component::NavigationList { .. } => "NavigationList",
            Component::Footer { .. } => "Footer",
        }
    }

    /// Whether the component is hidden from rendering.
    pub fn is_hidden(&self) -> bool {
        let visible = match self {
            Component::TextHeading { visible, .. }
            | Component::TextSubheading { visible, .. }
            | Component::TextBody { visible, .. }
            | Component::TextCaption { visible, .. }
            | Component::RichText { visible, .. }
            | Component::TextInput { visible, .. }
            | Component::TextArea { visible, .. }
            | Component::CheckboxGroup { visible, .. }
            | Component::RadioButtonsGroup { visible, .. }
            | Component::Dropdown { visible, .. }
            | Component::ChipsSelector { visible, .. }
            | Component::DatePicker { visible, .. }
            | Component::CalendarPicker { visible, .. }
            | Component::OptIn { visible, .. }
            | Component::EmbeddedLink { visible, .. }
            | Component::NavigationList { visible, .. } => *visible,
            Component::Form { .. } | Component::Footer { .. } => None,
        };
        visible == Some(false)
    }

    /// The form field name, for components that collect a value.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Component::TextInput { name, .. }
            | Component::TextArea { name, .. }
            | Component::CheckboxGroup { name, .. }
            | Component::RadioButtonsGroup { name, .. }
            | Component::Dropdown { name, .. }
            | Component::ChipsSelector { name, .. }
            | Component::DatePicker { name, .. }
            | Component::CalendarPicker { name, .. }
            | Component::OptIn { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The component's `name`, for any component that carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Component::Form { name, .. } | Component::NavigationList { name, .. } => Some(name),
            _ => self.field_name(),
        }
    }

    /// The data source, for selection components.
    pub fn data_source(&self) -> Option<&DataSource> {
        match self {
            Component::CheckboxGroup { data_source, .. }
            | Component::RadioButtonsGroup { data_source, .. }
            | Component::Dropdown { data_source, .. }
            | Component::ChipsSelector { data_source, .. } => data_source.as_ref(),
            _ => None,
        }
    }

    /// All actions reachable from this component, including per-row actions
    /// of a navigation list. Does not descend into form children.
    pub fn actions(&self) -> Vec<&Action> {
        match self {
            Component::CheckboxGroup {
                on_select_action, ..
            }
            | Component::RadioButtonsGroup {
                on_select_action, ..
            }
            | Component::Dropdown {
                on_select_action, ..
            }
            | Component::ChipsSelector {
                on_select_action, ..
            }
            | Component::DatePicker {
                on_select_action, ..
            }
            | Component::CalendarPicker {
                on_select_action, ..
            } => on_select_action.iter().collect(),
            Component::OptIn {
                on_click_action, ..
            }
            | Component::EmbeddedLink {
                on_click_action, ..
            }
            | Component::Footer {
                on_click_action, ..
            } => on_click_action.iter().collect(),
            Component::NavigationList { list_items, .. } => list_items
                .iter()
                .filter_map(|item| item.on_click_action.as_ref())
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout children
// ─────────────────────────────────────────────────────────────────────────────

/// A layout slot: a recognized component, or raw JSON preserved verbatim for
/// component types this vocabulary does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutChild {
    Component(Box<Component>),
    Other(Value),
}

impl LayoutChild {
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            LayoutChild::Component(component) => Some(component),
            LayoutChild::Other(_) => None,
        }
    }

    /// The `type` field of an unrecognized node, if it has one.
    pub fn other_type(&self) -> Option<&str> {
        match self {
            LayoutChild::Component(_) => None,
            LayoutChild::Other(value) => value.get("type").and_then(Value::as_str),
        }
    }
}

impl From<Component> for LayoutChild {
    fn from(component: Component) -> Self {
        LayoutChild::Component(Box::new(component))
    }
}

/// Visit every recognized component in a child list, descending into forms.
pub fn visit_components<'a, F>(children: &'a [LayoutChild], visit: &mut F)
where
    F: FnMut(&'a Component),
{
    for child in children {
        if let LayoutChild::Component(component) = child {
            visit(component);
            if let Component::Form { children, .. } = component.as_ref() {
                visit_components(children, visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;

    #[test]
    fn test_parses_text_input_with_kebab_fields() {
        let json = r#"{
            "type": "TextInput",
            "required": true,
            "label": "Regex Input",
            "input-type": "text",
            "pattern": "^\\d+$",
            "helper-text": "Digits only",
            "name": "regex input"
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        match &component {
            Component::TextInput {
                name,
                input_type,
                pattern,
                helper_text,
                ..
            } => {
                assert_eq!(name, "regex input");
                assert_eq!(input_type, &Some(InputKind::Text));
                assert_eq!(pattern.as_deref(), Some("^\\d+$"));
                assert_eq!(helper_text.as_deref(), Some("Digits only"));
            }
            other => panic!("wrong component: {}", other.kind_name()),
        }

        let back = serde_json::to_value(&component).unwrap();
        assert_eq!(back["input-type"], "text");
        assert_eq!(back["helper-text"], "Digits only");
    }

    #[test]
    fn test_unknown_component_preserved() {
        let json = r#"{ "type": "ImageCarousel", "images": ["a.png"] }"#;
        let child: LayoutChild = serde_json::from_str(json).unwrap();
        assert_eq!(child.other_type(), Some("ImageCarousel"));
        let back = serde_json::to_value(&child).unwrap();
        assert_eq!(back["images"][0], "a.png");
    }

    #[test]
    fn test_calendar_picker_keeps_its_own_tag() {
        let json = r#"{
            "type": "CalendarPicker",
            "name": "visit_date",
            "label": "Visit date",
            "min-date": "1696636800000",
            "unavailable-dates": ["1697068800000"]
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.kind_name(), "CalendarPicker");
        assert_eq!(component.field_name(), Some("visit_date"));

        let back = serde_json::to_value(&component).unwrap();
        assert_eq!(back["type"], "CalendarPicker");
        assert_eq!(back["min-date"], "1696636800000");
        assert_eq!(back["unavailable-dates"][0], "1697068800000");
    }

    #[test]
    fn test_unknown_input_type_preserved() {
        let kind: InputKind = serde_json::from_str("\"tel\"").unwrap();
        assert_eq!(kind, InputKind::Other("tel".to_string()));
        assert!(!kind.is_concealed());
        assert!(InputKind::Passcode.is_concealed());
    }

    #[test]
    fn test_data_source_binding_or_inline() {
        let binding: DataSource = serde_json::from_str("\"${data.all_extras}\"").unwrap();
        assert_eq!(
            binding.as_binding(),
            Some(Binding::Data("all_extras".to_string()))
        );

        let inline: DataSource =
            serde_json::from_str(r#"[{ "id": "1", "title": "Fries" }]"#).unwrap();
        assert!(inline.as_binding().is_none());
        match inline {
            DataSource::Inline(options) => assert_eq!(options[0].title, "Fries"),
            DataSource::Binding(_) => panic!("expected inline options"),
        }
    }

    #[test]
    fn test_form_collects_children() {
        let json = r#"{
            "type": "Form",
            "name": "text_input_form",
            "init-values": { "text input": "hello" },
            "children": [
                { "type": "TextInput", "name": "text input", "label": "Text" },
                { "type": "Footer", "label": "Continue",
                  "on-click-action": { "name": "complete", "payload": {} } }
            ]
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        let mut names = Vec::new();
        visit_components(std::slice::from_ref(&LayoutChild::from(component)), &mut |c| {
            names.push(c.kind_name());
        });
        assert_eq!(names, vec!["Form", "TextInput", "Footer"]);
    }

    #[test]
    fn test_navigation_list_actions() {
        let json = r#"{
            "type": "NavigationList",
            "name": "insurances",
            "list-items": [
                {
                    "id": "home",
                    "main-content": { "title": "Home Insurance", "metadata": "Cover" },
                    "end": { "title": "$100", "description": "/ month" },
                    "on-click-action": {
                        "name": "navigate",
                        "next": { "name": "SECOND_SCREEN", "type": "screen" },
                        "payload": {}
                    }
                }
            ]
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        let actions = component.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, ActionKind::Navigate);
        assert_eq!(
            actions[0].navigate_target().map(|s| s.as_str()),
            Some("SECOND_SCREEN")
        );
    }

    #[test]
    fn test_hidden_component() {
        let json = r#"{ "type": "TextHeading", "text": "Hi", "visible": false }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert!(component.is_hidden());

        let json = r#"{ "type": "TextHeading", "text": "Hi" }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert!(!component.is_hidden());
    }

    #[test]
    fn test_rich_text_lines() {
        let json = r#"{ "type": "RichText", "text": ["**hello**", "---", "- a list"] }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        match component {
            Component::RichText { text, .. } => {
                assert_eq!(text.to_text(), "**hello**\n---\n- a list");
            }
            other => panic!("wrong component: {}", other.kind_name()),
        }
    }
}
