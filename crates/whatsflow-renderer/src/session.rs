//! Interactive preview sessions.
//!
//! A [`PreviewSession`] holds one flow document and walks it the way a
//! WhatsApp client would: one current screen, form state per screen, a back
//! stack, and a record of what the flow sent out through `data_exchange` and
//! `complete` actions. Payload bindings are interpolated against that state,
//! so a completed session shows exactly what the published flow would submit.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;
use whatsflow_flow::{Action, ActionKind, Binding, Component, FlowDocument, Screen};
use whatsflow_types::ScreenId;

use crate::error::{RendererError, Result};
use crate::render::{init_values, render_screen};
use crate::widget::{AnswerValue, RenderedScreen, ScreenAnswers};

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// What activating an action did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The session moved to another screen.
    Navigated(ScreenId),
    /// The flow finished with the interpolated completion payload.
    Completed { payload: Map<String, Value> },
    /// Nothing changed; the action had no navigation effect here.
    Stayed,
}

/// A payload the flow sent to its data endpoint during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRecord {
    pub screen: ScreenId,
    pub payload: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// An in-memory walk through a flow document.
///
/// The current position is an index into `doc.screens`; every mutation that
/// moves it validates the destination first, so the index always names a
/// screen.
#[derive(Debug, Clone)]
pub struct PreviewSession {
    doc: FlowDocument,
    current: usize,
    back_stack: Vec<usize>,
    answers: HashMap<ScreenId, ScreenAnswers>,
    exchanges: Vec<ExchangeRecord>,
    completed: Option<Map<String, Value>>,
}

impl PreviewSession {
    /// Start a session at the document's first screen.
    pub fn new(doc: FlowDocument) -> Result<Self> {
        doc.first_screen()?;
        Ok(Self {
            doc,
            current: 0,
            back_stack: Vec::new(),
            answers: HashMap::new(),
            exchanges: Vec::new(),
            completed: None,
        })
    }

    pub fn doc(&self) -> &FlowDocument {
        &self.doc
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_screen(&self) -> &Screen {
        &self.doc.screens[self.current]
    }

    pub fn current_id(&self) -> &ScreenId {
        &self.current_screen().id
    }

    /// The completion payload, once the flow has finished.
    pub fn completion(&self) -> Option<&Map<String, Value>> {
        self.completed.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// Payloads sent through `data_exchange` actions so far.
    pub fn exchanges(&self) -> &[ExchangeRecord] {
        &self.exchanges
    }

    /// Form state entered on the given screen so far.
    pub fn answers_for(&self, screen: &ScreenId) -> Option<&ScreenAnswers> {
        self.answers.get(screen)
    }

    /// Render the current screen against this session's form state.
    pub fn render(&self) -> RenderedScreen {
        let empty = ScreenAnswers::new();
        let answers = self.answers.get(self.current_id()).unwrap_or(&empty);
        render_screen(&self.doc, self.current_screen(), answers)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate an action on the current screen.
    ///
    /// Failed navigations leave the session untouched.
    pub fn activate(&mut self, action: &Action) -> Result<Outcome> {
        self.ensure_active()?;
        match &action.name {
            ActionKind::Navigate => {
                let target = action
                    .navigate_target()
                    .ok_or(RendererError::MissingNavigateTarget)?;
                let index = self
                    .doc
                    .screen_index(target)
                    .ok_or_else(|| RendererError::UnknownScreen(target.clone()))?;
                let target = target.clone();
                self.back_stack.push(self.current);
                self.current = index;
                Ok(Outcome::Navigated(target))
            }
            ActionKind::Complete => {
                let payload = self.interpolate(&action.payload);
                self.completed = Some(payload.clone());
                Ok(Outcome::Completed { payload })
            }
            ActionKind::DataExchange => {
                let payload = self.interpolate(&action.payload);
                self.exchanges.push(ExchangeRecord {
                    screen: self.current_id().clone(),
                    payload: payload.clone(),
                });
                if self.current_screen().is_terminal() {
                    self.completed = Some(payload.clone());
                    Ok(Outcome::Completed { payload })
                } else {
                    self.advance()
                }
            }
            ActionKind::Other(name) => {
                debug!(action = %name, "action has no preview behavior");
                Ok(Outcome::Stayed)
            }
        }
    }

    /// Press the current screen's bottom button.
    pub fn activate_footer(&mut self) -> Result<Outcome> {
        let action = self.render().footer.action;
        self.activate(&action)
    }

    /// Step to the next screen in document order.
    pub fn advance(&mut self) -> Result<Outcome> {
        self.ensure_active()?;
        let next = self.current + 1;
        if next >= self.doc.screens.len() {
            return Ok(Outcome::Stayed);
        }
        self.back_stack.push(self.current);
        self.current = next;
        Ok(Outcome::Navigated(self.current_id().clone()))
    }

    /// Finish the flow with an empty payload, as the synthetic terminal
    /// button does.
    pub fn finish(&mut self) -> Result<Outcome> {
        self.ensure_active()?;
        let payload = Map::new();
        self.completed = Some(payload.clone());
        Ok(Outcome::Completed { payload })
    }

    /// Return to the previously shown screen, if any.
    pub fn back(&mut self) -> Result<Option<&Screen>> {
        self.ensure_active()?;
        match self.back_stack.pop() {
            Some(index) => {
                self.current = index;
                Ok(Some(self.current_screen()))
            }
            None => Ok(None),
        }
    }

    /// Jump directly to a screen by document position.
    pub fn jump_to(&mut self, index: usize) -> Result<&Screen> {
        self.ensure_active()?;
        if index >= self.doc.screens.len() {
            return Err(RendererError::ScreenIndex {
                index,
                count: self.doc.screens.len(),
            });
        }
        if index != self.current {
            self.back_stack.push(self.current);
            self.current = index;
        }
        Ok(self.current_screen())
    }

    /// Discard all progress and return to the first screen.
    pub fn reset(&mut self) {
        self.current = 0;
        self.back_stack.clear();
        self.answers.clear();
        self.exchanges.clear();
        self.completed = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form input
    // ─────────────────────────────────────────────────────────────────────────

    /// Type into a text input or text area.
    pub fn set_text(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::TextInput { .. } | Component::TextArea { .. } => {}
            _ => return Err(self.wrong_kind(field, "text")),
        }
        self.answers_mut()
            .insert(field.to_string(), AnswerValue::Text(value.into()));
        Ok(())
    }

    /// Pick a date, as an epoch-millisecond string.
    pub fn set_date(&mut self, field: &str, epoch_millis: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::DatePicker { .. } | Component::CalendarPicker { .. } => {}
            _ => return Err(self.wrong_kind(field, "a date")),
        }
        self.answers_mut()
            .insert(field.to_string(), AnswerValue::Text(epoch_millis.into()));
        Ok(())
    }

    /// Toggle one option of a checkbox group.
    pub fn toggle_checkbox(&mut self, field: &str, option_id: &str) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::CheckboxGroup { .. } => {}
            _ => return Err(self.wrong_kind(field, "checkbox selections")),
        }
        self.toggle_selection(field, option_id, None)
    }

    /// Toggle one chip, enforcing the component's selection limit.
    pub fn toggle_chip(&mut self, field: &str, option_id: &str) -> Result<()> {
        self.ensure_active()?;
        let max = match self.field(field)? {
            Component::ChipsSelector {
                max_selected_items, ..
            } => *max_selected_items,
            _ => return Err(self.wrong_kind(field, "chip selections")),
        };
        self.toggle_selection(field, option_id, max)
    }

    /// Choose a radio option.
    pub fn select_radio(&mut self, field: &str, option_id: &str) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::RadioButtonsGroup { .. } => {}
            _ => return Err(self.wrong_kind(field, "a radio selection")),
        }
        self.answers_mut()
            .insert(field.to_string(), AnswerValue::Selection(option_id.to_string()));
        Ok(())
    }

    /// Choose a dropdown option.
    pub fn select_dropdown(&mut self, field: &str, option_id: &str) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::Dropdown { .. } => {}
            _ => return Err(self.wrong_kind(field, "a dropdown selection")),
        }
        self.answers_mut()
            .insert(field.to_string(), AnswerValue::Selection(option_id.to_string()));
        Ok(())
    }

    /// Set an opt-in toggle.
    pub fn set_opt_in(&mut self, field: &str, accepted: bool) -> Result<()> {
        self.ensure_active()?;
        match self.field(field)? {
            Component::OptIn { .. } => {}
            _ => return Err(self.wrong_kind(field, "an opt-in flag")),
        }
        self.answers_mut()
            .insert(field.to_string(), AnswerValue::Flag(accepted));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<()> {
        if self.completed.is_some() {
            return Err(RendererError::FlowCompleted);
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Result<&Component> {
        let screen = self.current_screen();
        screen
            .components()
            .into_iter()
            .find(|component| component.field_name() == Some(name))
            .ok_or_else(|| RendererError::UnknownField {
                screen: screen.id.clone(),
                field: name.to_string(),
            })
    }

    fn wrong_kind(&self, field: &str, expected: &'static str) -> RendererError {
        RendererError::WrongFieldKind {
            screen: self.current_id().clone(),
            field: field.to_string(),
            expected,
        }
    }

    fn answers_mut(&mut self) -> &mut ScreenAnswers {
        let id = self.current_id().clone();
        self.answers.entry(id).or_default()
    }

    fn toggle_selection(&mut self, field: &str, option_id: &str, max: Option<u32>) -> Result<()> {
        let answers = self.answers_mut();
        let mut ids = match answers.get(field) {
            Some(AnswerValue::Selections(ids)) => ids.clone(),
            _ => Vec::new(),
        };
        if let Some(position) = ids.iter().position(|id| id == option_id) {
            ids.remove(position);
        } else {
            if let Some(max) = max {
                if ids.len() as u32 >= max {
                    return Err(RendererError::SelectionLimit {
                        field: field.to_string(),
                        max,
                    });
                }
            }
            ids.push(option_id.to_string());
        }
        answers.insert(field.to_string(), AnswerValue::Selections(ids));
        Ok(())
    }

    /// Interpolate an action payload against the current screen's state.
    ///
    /// `${form.x}` resolves to the entered answer, falling back to the form's
    /// initial value and then to null. `${data.x}` resolves to the screen's
    /// data value verbatim. Everything else passes through unchanged.
    fn interpolate(&self, payload: &Map<String, Value>) -> Map<String, Value> {
        let screen = self.current_screen();
        let init = init_values(screen);
        payload
            .iter()
            .map(|(key, value)| (key.clone(), self.interpolate_value(screen, &init, value)))
            .collect()
    }

    fn interpolate_value(
        &self,
        screen: &Screen,
        init: &Map<String, Value>,
        value: &Value,
    ) -> Value {
        let Some(binding) = value.as_str().and_then(Binding::parse) else {
            return value.clone();
        };
        match binding {
            Binding::Form(key) => {
                if let Some(answer) = self
                    .answers
                    .get(&screen.id)
                    .and_then(|answers| answers.get(&key))
                {
                    return answer.as_json();
                }
                init.get(&key).cloned().unwrap_or(Value::Null)
            }
            Binding::Data(key) => screen.data_value(&key).cloned().unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(json: &str) -> PreviewSession {
        let doc = FlowDocument::from_json(json).unwrap();
        PreviewSession::new(doc).unwrap()
    }

    fn two_screen_session() -> PreviewSession {
        session(
            r#"{
            "version": "7.0",
            "screens": [
                { "id": "MENU", "title": "Menu",
                  "layout": { "type": "SingleColumnLayout", "children": [
                      { "type": "NavigationList", "name": "choices", "list-items": [
                          { "id": "checkout", "main-content": { "title": "Checkout" },
                            "on-click-action": { "name": "navigate",
                              "next": { "type": "screen", "name": "DONE" },
                              "payload": {} } }
                      ] }
                  ] } },
                { "id": "DONE", "title": "Done", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [
                      { "type": "Form", "name": "f",
                        "init-values": { "note": "none" },
                        "children": [
                            { "type": "TextInput", "name": "note", "label": "Note" },
                            { "type": "Footer", "label": "Finish",
                              "on-click-action": { "name": "complete",
                                "payload": { "note": "${form.note}" } } }
                        ] }
                  ] } }
            ]
        }"#,
        )
    }

    #[test]
    fn test_new_rejects_empty_document() {
        let doc = FlowDocument::from_json(r#"{ "version": "7.0", "screens": [] }"#).unwrap();
        assert!(PreviewSession::new(doc).is_err());
    }

    #[test]
    fn test_nav_list_option_navigates_to_named_screen() {
        let mut session = two_screen_session();
        let rendered = session.render();
        let action = match rendered.widget("choices") {
            Some(crate::widget::Widget::NavList { rows, .. }) => {
                rows[0].action.clone().unwrap()
            }
            other => panic!("unexpected widget: {:?}", other),
        };
        let outcome = session.activate(&action).unwrap();
        assert_eq!(outcome, Outcome::Navigated(ScreenId::from("DONE")));
        assert_eq!(session.current_id().as_str(), "DONE");
    }

    #[test]
    fn test_unknown_navigate_target_leaves_session_untouched() {
        let mut session = two_screen_session();
        let action = Action::navigate(ScreenId::from("NOPE"));
        let err = session.activate(&action).unwrap_err();
        assert!(matches!(err, RendererError::UnknownScreen(id) if id.as_str() == "NOPE"));
        assert_eq!(session.current_id().as_str(), "MENU");
        assert!(session.back().unwrap().is_none());
    }

    #[test]
    fn test_complete_interpolates_answers_over_init_values() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        session.set_text("note", "ship friday").unwrap();
        let outcome = session.activate_footer().unwrap();
        assert_eq!(
            outcome,
            Outcome::Completed {
                payload: json!({ "note": "ship friday" }).as_object().cloned().unwrap()
            }
        );
        assert!(session.is_completed());
    }

    #[test]
    fn test_complete_falls_back_to_init_values() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        let outcome = session.activate_footer().unwrap();
        assert_eq!(
            outcome,
            Outcome::Completed {
                payload: json!({ "note": "none" }).as_object().cloned().unwrap()
            }
        );
    }

    #[test]
    fn test_data_exchange_records_payload_and_advances() {
        let mut session = session(
            r#"{
            "version": "7.0",
            "screens": [
                { "id": "A", "title": "A",
                  "data": { "city": "Lisbon" },
                  "layout": { "type": "SingleColumnLayout", "children": [] } },
                { "id": "B", "title": "B", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [] } }
            ]
        }"#,
        );
        let payload = json!({ "city": "${data.city}" }).as_object().cloned().unwrap();
        let action = Action::data_exchange(payload);
        let outcome = session.activate(&action).unwrap();
        assert_eq!(outcome, Outcome::Navigated(ScreenId::from("B")));
        assert_eq!(session.exchanges().len(), 1);
        assert_eq!(session.exchanges()[0].screen.as_str(), "A");
        assert_eq!(session.exchanges()[0].payload["city"], json!("Lisbon"));
        assert!(!session.is_completed());
    }

    #[test]
    fn test_data_exchange_on_terminal_screen_completes() {
        let mut session = session(
            r#"{
            "version": "7.0",
            "screens": [
                { "id": "A", "title": "A", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [] } }
            ]
        }"#,
        );
        let outcome = session.activate(&Action::data_exchange(Map::new())).unwrap();
        assert!(matches!(outcome, Outcome::Completed { .. }));
        assert!(session.is_completed());
        assert_eq!(session.exchanges().len(), 1);
    }

    #[test]
    fn test_completed_session_rejects_further_input() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        session.activate_footer().unwrap();
        assert!(matches!(
            session.set_text("note", "late"),
            Err(RendererError::FlowCompleted)
        ));
        assert!(matches!(session.advance(), Err(RendererError::FlowCompleted)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        session.set_text("note", "draft").unwrap();
        session.activate_footer().unwrap();
        session.reset();
        assert_eq!(session.current_id().as_str(), "MENU");
        assert!(!session.is_completed());
        assert!(session.answers_for(&ScreenId::from("DONE")).is_none());
    }

    #[test]
    fn test_back_pops_the_navigation_stack() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        let previous = session.back().unwrap().unwrap();
        assert_eq!(previous.id.as_str(), "MENU");
        assert!(session.back().unwrap().is_none());
    }

    #[test]
    fn test_jump_to_validates_the_index() {
        let mut session = two_screen_session();
        assert!(matches!(
            session.jump_to(5),
            Err(RendererError::ScreenIndex { index: 5, count: 2 })
        ));
        let screen = session.jump_to(1).unwrap();
        assert_eq!(screen.id.as_str(), "DONE");
    }

    #[test]
    fn test_chip_limit_enforced() {
        let mut session = session(
            r#"{
            "version": "7.0",
            "screens": [
                { "id": "A", "title": "A", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [
                      { "type": "ChipsSelector", "name": "toppings",
                        "max-selected-items": 1,
                        "data-source": [
                            { "id": "onions", "title": "Onions" },
                            { "id": "bacon", "title": "Bacon" }
                        ] }
                  ] } }
            ]
        }"#,
        );
        session.toggle_chip("toppings", "onions").unwrap();
        let err = session.toggle_chip("toppings", "bacon").unwrap_err();
        assert!(matches!(
            err,
            RendererError::SelectionLimit { max: 1, .. }
        ));
        session.toggle_chip("toppings", "onions").unwrap();
        session.toggle_chip("toppings", "bacon").unwrap();
    }

    #[test]
    fn test_wrong_field_kind_rejected() {
        let mut session = two_screen_session();
        session.advance().unwrap();
        assert!(matches!(
            session.set_opt_in("note", true),
            Err(RendererError::WrongFieldKind { .. })
        ));
        assert!(matches!(
            session.set_text("missing", "x"),
            Err(RendererError::UnknownField { .. })
        ));
    }
}
