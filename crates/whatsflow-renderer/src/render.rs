//! The screen renderer: a tree walk from layout components to widgets.
//!
//! Rendering is infallible. Hidden components, unrecognized node types, and
//! bindings that do not resolve all degrade to "draw less" rather than
//! failing the screen; validation exists to surface those defects ahead of
//! time.

use serde_json::{Map, Value};
use tracing::debug;
use whatsflow_flow::{
    Action, Binding, Component, DataSource, FlowDocument, LayoutChild, Screen, SelectOption,
};
use whatsflow_types::ScreenId;

use crate::widget::{AnswerValue, FooterButton, NavRow, RenderedScreen, ScreenAnswers, Widget};

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render a screen against the given form state.
pub fn render_screen(
    doc: &FlowDocument,
    screen: &Screen,
    answers: &ScreenAnswers,
) -> RenderedScreen {
    let init = init_values(screen);
    let mut widgets = Vec::new();
    let mut footer = None;

    render_children(
        doc,
        screen,
        &screen.layout.children,
        answers,
        &init,
        &mut widgets,
        &mut footer,
    );

    RenderedScreen {
        id: screen.id.clone(),
        title: screen.title.clone(),
        terminal: screen.is_terminal(),
        widgets,
        footer: footer.unwrap_or_else(|| synthetic_footer(doc, screen)),
    }
}

/// Initial values declared by the screen's forms, merged in document order.
pub fn init_values(screen: &Screen) -> Map<String, Value> {
    let mut merged = Map::new();
    screen.visit_components(&mut |component| {
        if let Component::Form {
            init_values: Some(values),
            ..
        } = component
        {
            for (key, value) in values {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    });
    merged
}

/// The screen after `current` in document order.
pub fn next_screen<'a>(doc: &'a FlowDocument, current: &ScreenId) -> Option<&'a Screen> {
    let index = doc.screen_index(current)?;
    doc.screens.get(index + 1)
}

/// The action a screen's button falls back to when the document does not
/// provide one: complete on terminal screens, step forward otherwise.
fn default_action(doc: &FlowDocument, screen: &Screen) -> Action {
    if screen.is_terminal() {
        return Action::complete();
    }
    match next_screen(doc, &screen.id) {
        Some(next) => Action::navigate(next.id.clone()),
        None => Action::complete(),
    }
}

fn synthetic_footer(doc: &FlowDocument, screen: &Screen) -> FooterButton {
    let terminal = screen.is_terminal();
    FooterButton {
        label: if terminal { "Continue" } else { "Proceed" }.to_string(),
        action: default_action(doc, screen),
        synthetic: true,
    }
}

#[allow(clippy::too_many_arguments)]
fn render_children(
    doc: &FlowDocument,
    screen: &Screen,
    children: &[LayoutChild],
    answers: &ScreenAnswers,
    init: &Map<String, Value>,
    widgets: &mut Vec<Widget>,
    footer: &mut Option<FooterButton>,
) {
    for child in children {
        let Some(component) = child.as_component() else {
            if let Some(kind) = child.other_type() {
                debug!(screen = %screen.id, kind, "skipping unrecognized component");
            }
            continue;
        };
        if component.is_hidden() {
            continue;
        }
        match component {
            Component::Form { children, .. } => {
                render_children(doc, screen, children, answers, init, widgets, footer);
            }
            Component::Footer {
                label,
                on_click_action,
            } => {
                if footer.is_none() {
                    *footer = Some(FooterButton {
                        label: label.clone(),
                        action: on_click_action
                            .clone()
                            .unwrap_or_else(|| default_action(doc, screen)),
                        synthetic: false,
                    });
                }
            }
            other => {
                if let Some(widget) = render_component(screen, other, answers, init) {
                    widgets.push(widget);
                }
            }
        }
    }
}

fn render_component(
    screen: &Screen,
    component: &Component,
    answers: &ScreenAnswers,
    init: &Map<String, Value>,
) -> Option<Widget> {
    let widget = match component {
        Component::TextHeading { text, .. } => Widget::Heading {
            text: text.to_text(),
        },
        Component::TextSubheading { text, .. } => Widget::Subheading {
            text: text.to_text(),
        },
        Component::TextBody { text, markdown, .. } => Widget::Body {
            text: text.to_text(),
            markdown: markdown.unwrap_or(false),
        },
        Component::TextCaption { text, .. } => Widget::Caption {
            text: text.to_text(),
        },
        Component::RichText { text, .. } => Widget::RichText {
            text: text.to_text(),
        },
        Component::TextInput {
            name,
            label,
            input_type,
            required,
            pattern,
            helper_text,
            ..
        } => Widget::TextField {
            name: name.clone(),
            label: label.clone(),
            kind: input_type.clone().unwrap_or_default(),
            required: required.unwrap_or(false),
            pattern: pattern.clone(),
            helper_text: helper_text.clone(),
            value: text_value(answers, init, name),
        },
        Component::TextArea {
            name,
            label,
            required,
            helper_text,
            ..
        } => Widget::TextArea {
            name: name.clone(),
            label: label.clone(),
            required: required.unwrap_or(false),
            helper_text: helper_text.clone(),
            value: text_value(answers, init, name),
        },
        Component::CheckboxGroup {
            name,
            label,
            description,
            required,
            data_source,
            on_select_action,
            ..
        } => Widget::CheckboxGroup {
            name: name.clone(),
            label: label.clone(),
            description: description.clone(),
            required: required.unwrap_or(false),
            options: resolve_options(screen, data_source.as_ref()),
            selected: selected_many(answers, init, name),
            on_select: on_select_action.clone(),
        },
        Component::RadioButtonsGroup {
            name,
            label,
            description,
            required,
            data_source,
            on_select_action,
            ..
        } => Widget::RadioGroup {
            name: name.clone(),
            label: label.clone(),
            description: description.clone(),
            required: required.unwrap_or(false),
            options: resolve_options(screen, data_source.as_ref()),
            selected: selected_one(answers, init, name),
            on_select: on_select_action.clone(),
        },
        Component::Dropdown {
            name,
            label,
            required,
            data_source,
            on_select_action,
            ..
        } => Widget::Dropdown {
            name: name.clone(),
            label: label.clone(),
            required: required.unwrap_or(false),
            options: resolve_options(screen, data_source.as_ref()),
            selected: selected_one(answers, init, name),
            on_select: on_select_action.clone(),
        },
        Component::ChipsSelector {
            name,
            label,
            description,
            max_selected_items,
            data_source,
            on_select_action,
            ..
        } => Widget::ChipSelector {
            name: name.clone(),
            label: label.clone(),
            description: description.clone(),
            max_selected: *max_selected_items,
            options: resolve_options(screen, data_source.as_ref()),
            selected: selected_many(answers, init, name),
            on_select: on_select_action.clone(),
        },
        Component::DatePicker {
            name,
            label,
            helper_text,
            min_date,
            max_date,
            unavailable_dates,
            on_select_action,
            ..
        }
        | Component::CalendarPicker {
            name,
            label,
            helper_text,
            min_date,
            max_date,
            unavailable_dates,
            on_select_action,
            ..
        } => Widget::DateField {
            name: name.clone(),
            label: label.clone(),
            helper_text: helper_text.clone(),
            min_date: min_date.clone(),
            max_date: max_date.clone(),
            unavailable: unavailable_dates.clone().unwrap_or_default(),
            value: text_value(answers, init, name),
            on_select: on_select_action.clone(),
        },
        Component::OptIn {
            name,
            label,
            required,
            on_click_action,
            ..
        } => Widget::OptIn {
            name: name.clone(),
            label: label.clone(),
            required: required.unwrap_or(false),
            accepted: flag_value(answers, init, name),
            on_click: on_click_action.clone(),
        },
        Component::EmbeddedLink {
            text,
            on_click_action,
            ..
        } => Widget::Link {
            text: text.clone(),
            on_click: on_click_action.clone(),
        },
        Component::NavigationList {
            name, list_items, ..
        } => Widget::NavList {
            name: name.clone(),
            rows: list_items
                .iter()
                .map(|item| NavRow {
                    id: item.id.clone(),
                    title: item.main_content.title.clone(),
                    metadata: item.main_content.metadata.clone(),
                    end_title: item.end.as_ref().map(|end| end.title.clone()),
                    end_description: item.end.as_ref().and_then(|end| end.description.clone()),
                    action: item.on_click_action.clone(),
                })
                .collect(),
        },
        // Handled by the caller.
        Component::Form { .. } | Component::Footer { .. } => return None,
    };
    Some(widget)
}

// ─────────────────────────────────────────────────────────────────────────────
// Value resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve a selection component's options: inline lists verbatim, data
/// bindings against the screen's data object. Array data is taken as rows;
/// JSON-schema shaped data contributes its `__example__` rows.
fn resolve_options(screen: &Screen, source: Option<&DataSource>) -> Vec<SelectOption> {
    let rows = match source {
        None => return Vec::new(),
        Some(DataSource::Inline(options)) => return options.clone(),
        Some(DataSource::Binding(raw)) => {
            let Some(Binding::Data(key)) = Binding::parse(raw) else {
                debug!(screen = %screen.id, binding = raw, "data source binding did not parse");
                return Vec::new();
            };
            let Some(value) = screen.data_value(&key) else {
                debug!(screen = %screen.id, binding = raw, "data source binding did not resolve");
                return Vec::new();
            };
            match value {
                Value::Array(_) => value.clone(),
                Value::Object(map) => map.get("__example__").cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            }
        }
    };
    serde_json::from_value(rows).unwrap_or_default()
}

fn text_value(answers: &ScreenAnswers, init: &Map<String, Value>, name: &str) -> Option<String> {
    if let Some(answer) = answers.get(name) {
        return answer.as_text().map(str::to_string);
    }
    init.get(name).and_then(Value::as_str).map(str::to_string)
}

fn selected_one(answers: &ScreenAnswers, init: &Map<String, Value>, name: &str) -> Option<String> {
    if let Some(AnswerValue::Selection(id)) = answers.get(name) {
        return Some(id.clone());
    }
    init.get(name).and_then(Value::as_str).map(str::to_string)
}

fn selected_many(answers: &ScreenAnswers, init: &Map<String, Value>, name: &str) -> Vec<String> {
    if let Some(AnswerValue::Selections(ids)) = answers.get(name) {
        return ids.clone();
    }
    init.get(name)
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn flag_value(answers: &ScreenAnswers, init: &Map<String, Value>, name: &str) -> bool {
    if let Some(AnswerValue::Flag(flag)) = answers.get(name) {
        return *flag;
    }
    init.get(name).and_then(Value::as_bool).unwrap_or(false)
}
