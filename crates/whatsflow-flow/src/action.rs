//! Actions attached to interactive components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use whatsflow_types::ScreenId;

// ─────────────────────────────────────────────────────────────────────────────
// Action
// ─────────────────────────────────────────────────────────────────────────────

/// What an action does when triggered.
///
/// Unknown action names are preserved rather than rejected so documents
/// written against newer flow versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Finish the flow and hand the payload back to the conversation.
    Complete,
    /// Move to the screen named in `next`.
    Navigate,
    /// Send the payload to the data endpoint and continue.
    DataExchange,
    /// Any other action name.
    #[serde(untagged)]
    Other(String),
}

impl ActionKind {
    /// The wire name of the action.
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Complete => "complete",
            ActionKind::Navigate => "navigate",
            ActionKind::DataExchange => "data_exchange",
            ActionKind::Other(name) => name,
        }
    }
}

/// Where a navigate action goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTarget {
    /// Target kind, `"screen"` in every known document.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The screen to navigate to.
    ///
    /// Optional at parse time so malformed documents can still be loaded
    /// and reported by validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ScreenId>,
}

impl NextTarget {
    /// Target for a named screen.
    pub fn screen(name: impl Into<ScreenId>) -> Self {
        Self {
            kind: Some("screen".to_string()),
            name: Some(name.into()),
        }
    }
}

/// An action attached to a component, triggered by click or select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action name.
    pub name: ActionKind,

    /// Navigation target, only meaningful for navigate actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextTarget>,

    /// Payload delivered with the action. Values may be `${form.*}` or
    /// `${data.*}` bindings resolved when the action fires.
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl Action {
    /// A bare `complete` action with an empty payload.
    pub fn complete() -> Self {
        Self {
            name: ActionKind::Complete,
            next: None,
            payload: Map::new(),
        }
    }

    /// A `navigate` action targeting a screen.
    pub fn navigate(target: impl Into<ScreenId>) -> Self {
        Self {
            name: ActionKind::Navigate,
            next: Some(NextTarget::screen(target)),
            payload: Map::new(),
        }
    }

    /// A `data_exchange` action with the given payload.
    pub fn data_exchange(payload: Map<String, Value>) -> Self {
        Self {
            name: ActionKind::DataExchange,
            next: None,
            payload,
        }
    }

    /// The screen this action navigates to, when it is a well formed
    /// navigate action.
    pub fn navigate_target(&self) -> Option<&ScreenId> {
        if self.name != ActionKind::Navigate {
            return None;
        }
        self.next.as_ref()?.name.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ActionKind::Complete).unwrap(),
            "\"complete\""
        );
        assert_eq!(
            serde_json::to_string(&ActionKind::DataExchange).unwrap(),
            "\"data_exchange\""
        );
    }

    #[test]
    fn test_unknown_action_kind_preserved() {
        let kind: ActionKind = serde_json::from_str("\"update_data\"").unwrap();
        assert_eq!(kind, ActionKind::Other("update_data".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"update_data\"");
    }

    #[test]
    fn test_navigate_target() {
        let action = Action::navigate("SECOND_SCREEN");
        assert_eq!(
            action.navigate_target().map(|s| s.as_str()),
            Some("SECOND_SCREEN")
        );
        assert_eq!(Action::complete().navigate_target(), None);
    }

    #[test]
    fn test_parses_action_with_payload() {
        let action: Action = serde_json::from_str(
            r#"{
                "name": "data_exchange",
                "payload": { "extras": "${form.extras}" }
            }"#,
        )
        .unwrap();
        assert_eq!(action.name, ActionKind::DataExchange);
        assert_eq!(
            action.payload.get("extras").and_then(|v| v.as_str()),
            Some("${form.extras}")
        );
    }

    #[test]
    fn test_parses_navigate_without_target() {
        // Malformed but loadable; validation reports it.
        let action: Action = serde_json::from_str(r#"{ "name": "navigate", "payload": {} }"#)
            .unwrap();
        assert_eq!(action.name, ActionKind::Navigate);
        assert_eq!(action.navigate_target(), None);
    }

    #[test]
    fn test_empty_payload_serialized() {
        let json = serde_json::to_value(Action::complete()).unwrap();
        assert!(json.get("payload").is_some());
        assert!(json.get("next").is_none());
    }
}
