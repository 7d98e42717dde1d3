//! Static validation of flow documents.
//!
//! Validation never mutates or rejects a document; it reports. Errors are
//! defects that will break the flow at runtime or on publish, warnings are
//! likely mistakes that still render.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use whatsflow_types::ScreenId;

use crate::action::{Action, ActionKind};
use crate::binding::{Binding, is_binding};
use crate::component::{Component, DataSource, LayoutChild};
use crate::document::{FlowDocument, Screen};

// ─────────────────────────────────────────────────────────────────────────────
// Issues
// ─────────────────────────────────────────────────────────────────────────────

/// A defect that breaks the flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document has no screens")]
    NoScreens,

    #[error("duplicate screen id '{id}'")]
    DuplicateScreenId { id: ScreenId },

    #[error("screen '{screen}': navigate action has no target screen")]
    MissingNavigateTarget { screen: ScreenId },

    #[error("screen '{screen}': navigate target '{target}' does not exist")]
    UnknownNavigateTarget { screen: ScreenId, target: ScreenId },

    #[error("screen '{screen}': {component} has an empty name")]
    EmptyComponentName { screen: ScreenId, component: String },

    #[error("routing model references unknown screen '{id}'")]
    UnknownRoutingScreen { id: ScreenId },
}

/// A likely mistake that still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("no screen is marked terminal; the flow can never complete")]
    NoTerminalScreen,

    #[error("screen '{screen}' is terminal but navigates to '{target}'")]
    NavigateFromTerminal { screen: ScreenId, target: ScreenId },

    #[error("screen '{screen}': binding '{binding}' does not resolve")]
    UnresolvedBinding { screen: ScreenId, binding: String },

    #[error("screen '{screen}': field name '{name}' is used more than once")]
    DuplicateFieldName { screen: ScreenId, name: String },

    #[error("screen '{screen}': unrecognized component type '{kind}'")]
    UnrecognizedComponent { screen: ScreenId, kind: String },
}

/// The outcome of validating a document.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True when no errors were found. Warnings do not fail a report.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when neither errors nor warnings were found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a flow document.
pub fn validate(doc: &FlowDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    if doc.screens.is_empty() {
        report.errors.push(ValidationError::NoScreens);
        return report;
    }

    let mut seen_ids: HashSet<&ScreenId> = HashSet::new();
    for screen in &doc.screens {
        if !seen_ids.insert(&screen.id) {
            report.errors.push(ValidationError::DuplicateScreenId {
                id: screen.id.clone(),
            });
        }
    }

    if !doc.has_terminal_screen() {
        report.warnings.push(ValidationWarning::NoTerminalScreen);
    }

    for screen in &doc.screens {
        check_screen(doc, screen, &mut report);
    }

    check_routing_model(doc, &mut report);

    report
}

fn check_screen(doc: &FlowDocument, screen: &Screen, report: &mut ValidationReport) {
    let mut field_names: HashSet<&str> = HashSet::new();

    screen.visit_components(&mut |component| {
        check_component_name(screen, component, report);
        check_data_source(screen, component, report);

        if let Some(name) = component.field_name() {
            if !name.trim().is_empty() && !field_names.insert(name) {
                report.warnings.push(ValidationWarning::DuplicateFieldName {
                    screen: screen.id.clone(),
                    name: name.to_string(),
                });
            }
        }

        for action in component.actions() {
            check_action(doc, screen, action, report);
        }
    });

    check_unrecognized(screen, &screen.layout.children, report);

    // Form field names are the namespace payload `${form.*}` bindings
    // resolve against.
    for component in screen.components() {
        for action in component.actions() {
            check_payload_bindings(screen, &field_names, action, report);
        }
    }
}

fn check_component_name(screen: &Screen, component: &Component, report: &mut ValidationReport) {
    if let Some(name) = component.name() {
        if name.trim().is_empty() {
            report.errors.push(ValidationError::EmptyComponentName {
                screen: screen.id.clone(),
                component: component.kind_name().to_string(),
            });
        }
    }
}

fn check_data_source(screen: &Screen, component: &Component, report: &mut ValidationReport) {
    let Some(DataSource::Binding(raw)) = component.data_source() else {
        return;
    };
    let resolved = match Binding::parse(raw) {
        Some(Binding::Data(key)) => screen.data_value(&key).is_some(),
        // Form bindings and unparseable expressions never resolve as a
        // data source.
        Some(Binding::Form(_)) | None => false,
    };
    if !resolved {
        report.warnings.push(ValidationWarning::UnresolvedBinding {
            screen: screen.id.clone(),
            binding: raw.clone(),
        });
    }
}

fn check_action(doc: &FlowDocument, screen: &Screen, action: &Action, report: &mut ValidationReport) {
    if action.name != ActionKind::Navigate {
        return;
    }
    let Some(target) = action.navigate_target() else {
        report.errors.push(ValidationError::MissingNavigateTarget {
            screen: screen.id.clone(),
        });
        return;
    };
    if doc.screen(target).is_none() {
        report.errors.push(ValidationError::UnknownNavigateTarget {
            screen: screen.id.clone(),
            target: target.clone(),
        });
    } else if screen.is_terminal() {
        report.warnings.push(ValidationWarning::NavigateFromTerminal {
            screen: screen.id.clone(),
            target: target.clone(),
        });
    }
}

fn check_payload_bindings(
    screen: &Screen,
    field_names: &HashSet<&str>,
    action: &Action,
    report: &mut ValidationReport,
) {
    for value in action.payload.values() {
        let Some(raw) = value.as_str() else { continue };
        if !is_binding(raw) {
            continue;
        }
        let resolved = match Binding::parse(raw) {
            Some(Binding::Form(key)) => field_names.contains(key.as_str()),
            Some(Binding::Data(key)) => screen.data_value(&key).is_some(),
            None => false,
        };
        if !resolved {
            report.warnings.push(ValidationWarning::UnresolvedBinding {
                screen: screen.id.clone(),
                binding: raw.to_string(),
            });
        }
    }
}

fn check_unrecognized(screen: &Screen, children: &[LayoutChild], report: &mut ValidationReport) {
    for child in children {
        match child {
            LayoutChild::Other(value) => {
                let kind = value
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("<missing type>");
                report.warnings.push(ValidationWarning::UnrecognizedComponent {
                    screen: screen.id.clone(),
                    kind: kind.to_string(),
                });
            }
            LayoutChild::Component(component) => {
                if let Component::Form { children, .. } = component.as_ref() {
                    check_unrecognized(screen, children, report);
                }
            }
        }
    }
}

fn check_routing_model(doc: &FlowDocument, report: &mut ValidationReport) {
    for (source, targets) in doc.routing_entries() {
        if doc.screen(&source).is_none() {
            report
                .errors
                .push(ValidationError::UnknownRoutingScreen { id: source });
        }
        for target in targets {
            if doc.screen(&target).is_none() {
                report
                    .errors
                    .push(ValidationError::UnknownRoutingScreen { id: target });
            }
        }
    }
}
