//! The flow document: versions, screens, and routing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use whatsflow_types::ScreenId;

use crate::component::{Component, LayoutChild, visit_components};
use crate::error::{FlowError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// A screen's layout container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Layout kind, `"SingleColumnLayout"` in every known document.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub children: Vec<LayoutChild>,
}

impl Layout {
    /// A single column layout with the given children.
    pub fn single_column(children: Vec<LayoutChild>) -> Self {
        Self {
            kind: "SingleColumnLayout".to_string(),
            children,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Screen
// ─────────────────────────────────────────────────────────────────────────────

/// One screen of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub title: String,

    /// Terminal screens end the flow when their action completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,

    /// Screen-scoped data referenced by `${data.*}` bindings. Array values
    /// may be written as JSON-schema shaped objects carrying their sample
    /// rows under `__example__`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,

    pub layout: Layout,
}

impl Screen {
    pub fn is_terminal(&self) -> bool {
        self.terminal.unwrap_or(false)
    }

    /// Visit every recognized component on the screen, descending into forms.
    pub fn visit_components<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Component),
    {
        visit_components(&self.layout.children, visit);
    }

    /// All recognized components on the screen in document order.
    pub fn components(&self) -> Vec<&Component> {
        let mut out = Vec::new();
        self.visit_components(&mut |component| out.push(component));
        out
    }

    /// Look up a `data` entry by key.
    pub fn data_value(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flow document
// ─────────────────────────────────────────────────────────────────────────────

/// A complete WhatsApp flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Flow JSON schema version, e.g. `"7.0"`.
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_api_version: Option<String>,

    /// Declared screen transitions, screen id to list of reachable screen
    /// ids. Kept as raw JSON because drafting tools emit loose shapes here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_model: Option<Map<String, Value>>,

    pub screens: Vec<Screen>,
}

impl FlowDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from an already-deserialized JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to an indented JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The screen to show first.
    pub fn first_screen(&self) -> Result<&Screen> {
        self.screens.first().ok_or(FlowError::Empty)
    }

    /// Look up a screen by id.
    pub fn screen(&self, id: &ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|screen| &screen.id == id)
    }

    /// Position of a screen in document order.
    pub fn screen_index(&self, id: &ScreenId) -> Option<usize> {
        self.screens.iter().position(|screen| &screen.id == id)
    }

    /// Ids of all screens in document order.
    pub fn screen_ids(&self) -> Vec<&ScreenId> {
        self.screens.iter().map(|screen| &screen.id).collect()
    }

    /// Whether any screen is marked terminal.
    pub fn has_terminal_screen(&self) -> bool {
        self.screens.iter().any(Screen::is_terminal)
    }

    /// Routing model entries parsed as screen-id lists. Entries whose value
    /// is not an array of strings yield an empty list.
    pub fn routing_entries(&self) -> Vec<(ScreenId, Vec<ScreenId>)> {
        let Some(model) = &self.routing_model else {
            return Vec::new();
        };
        model
            .iter()
            .map(|(key, value)| {
                let targets = value
                    .as_array()
                    .map(|entries| {
                        entries
                            .iter()
                            .filter_map(Value::as_str)
                            .map(ScreenId::from)
                            .collect()
                    })
                    .unwrap_or_default();
                (ScreenId::from(key.as_str()), targets)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_screen_doc() -> FlowDocument {
        FlowDocument::from_json(
            r#"{
                "version": "7.0",
                "data_api_version": "3.0",
                "routing_model": { "FIRST": ["SECOND"] },
                "screens": [
                    {
                        "id": "FIRST",
                        "title": "First",
                        "layout": {
                            "type": "SingleColumnLayout",
                            "children": [
                                { "type": "TextHeading", "text": "Welcome" },
                                { "type": "Footer", "label": "Next",
                                  "on-click-action": {
                                      "name": "navigate",
                                      "next": { "type": "screen", "name": "SECOND" },
                                      "payload": {}
                                  } }
                            ]
                        }
                    },
                    {
                        "id": "SECOND",
                        "title": "Second",
                        "terminal": true,
                        "layout": {
                            "type": "SingleColumnLayout",
                            "children": [
                                { "type": "Footer", "label": "Done",
                                  "on-click-action": { "name": "complete", "payload": {} } }
                            ]
                        }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_screen_lookup() {
        let doc = two_screen_doc();
        assert_eq!(doc.first_screen().unwrap().id.as_str(), "FIRST");
        assert!(doc.screen(&ScreenId::from("SECOND")).is_some());
        assert!(doc.screen(&ScreenId::from("MISSING")).is_none());
        assert_eq!(doc.screen_index(&ScreenId::from("SECOND")), Some(1));
    }

    #[test]
    fn test_terminal_flags() {
        let doc = two_screen_doc();
        assert!(!doc.first_screen().unwrap().is_terminal());
        assert!(doc.screen(&ScreenId::from("SECOND")).unwrap().is_terminal());
        assert!(doc.has_terminal_screen());
    }

    #[test]
    fn test_routing_entries() {
        let doc = two_screen_doc();
        let entries = doc.routing_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.as_str(), "FIRST");
        assert_eq!(entries[0].1, vec![ScreenId::from("SECOND")]);
    }

    #[test]
    fn test_round_trip_preserves_unknown_nodes() {
        let json = r#"{
            "version": "7.0",
            "screens": [
                {
                    "id": "ONLY",
                    "title": "Only",
                    "layout": {
                        "type": "SingleColumnLayout",
                        "children": [
                            { "type": "ImageCarousel", "images": ["x.png"], "height": 120 }
                        ]
                    }
                }
            ]
        }"#;
        let doc = FlowDocument::from_json(json).unwrap();
        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        let child = &value["screens"][0]["layout"]["children"][0];
        assert_eq!(child["type"], "ImageCarousel");
        assert_eq!(child["height"], 120);
    }

    #[test]
    fn test_empty_document_has_no_first_screen() {
        let doc = FlowDocument::from_json(r#"{ "version": "7.0", "screens": [] }"#).unwrap();
        assert!(matches!(doc.first_screen(), Err(FlowError::Empty)));
    }

    #[test]
    fn test_from_value() {
        let value = serde_json::json!({
            "version": "7.0",
            "screens": [
                { "id": "A", "title": "A",
                  "layout": { "type": "SingleColumnLayout", "children": [] } }
            ]
        });
        let doc = FlowDocument::from_value(value).unwrap();
        assert_eq!(doc.screens.len(), 1);
    }
}
