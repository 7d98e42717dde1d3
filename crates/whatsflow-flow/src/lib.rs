//! WhatsApp Flow JSON document model.
//!
//! A flow document is the JSON a business publishes to WhatsApp: a list of
//! screens, each a tree of layout components, wired together with navigate
//! and complete actions. This crate parses, serializes, and validates such
//! documents while preserving nodes it does not recognize.

pub mod action;
pub mod binding;
pub mod component;
pub mod document;
pub mod error;
pub mod validate;

pub use action::{Action, ActionKind, NextTarget};
pub use binding::Binding;
pub use component::{
    Component, DataSource, InputKind, LayoutChild, ListItem, ListItemContent, ListItemEnd,
    SelectOption, TextValue, visit_components,
};
pub use document::{FlowDocument, Layout, Screen};
pub use error::{FlowError, Result};
pub use validate::{ValidationError, ValidationReport, ValidationWarning, validate};
