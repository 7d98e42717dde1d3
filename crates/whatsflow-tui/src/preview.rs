//! Preview pane state.
//!
//! Wraps a [`PreviewSession`] with a selection cursor over the rendered
//! screen's interactive pieces. The pane mutates the session (toggles,
//! navigation, completion) and keeps a cached render in sync; drawing lives
//! in `ui::preview`.

use serde_json::Value;
use whatsflow_flow::FlowDocument;
use whatsflow_renderer::{Outcome, PreviewSession, RenderedScreen, RendererError, Result, Widget};
use whatsflow_types::ScreenId;

/// One selectable item on the rendered screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selectable {
    /// One option of a checkbox, radio, dropdown, or chip widget.
    Option { widget: usize, option: usize },
    /// One row of a navigation list.
    NavRow { widget: usize, row: usize },
    /// An opt-in toggle.
    OptIn { widget: usize },
    /// An embedded link.
    Link { widget: usize },
    /// A text, text-area, or date field.
    Field { widget: usize },
    /// The screen's bottom action button.
    Footer,
}

/// The interactive preview, one per loaded flow document.
#[derive(Debug, Clone)]
pub struct PreviewPane {
    session: PreviewSession,
    rendered: RenderedScreen,
    entries: Vec<Selectable>,
    selected: usize,
}

impl PreviewPane {
    /// Start a preview at the document's first screen.
    pub fn new(doc: FlowDocument) -> Result<Self> {
        let session = PreviewSession::new(doc)?;
        let rendered = session.render();
        let entries = collect_entries(&rendered);
        Ok(Self {
            session,
            rendered,
            entries,
            selected: 0,
        })
    }

    pub fn session(&self) -> &PreviewSession {
        &self.session
    }

    /// The current screen as last rendered.
    pub fn rendered(&self) -> &RenderedScreen {
        &self.rendered
    }

    /// The currently selected item, if the screen has any.
    pub fn selection(&self) -> Option<&Selectable> {
        self.entries.get(self.selected)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_completed(&self) -> bool {
        self.session.is_completed()
    }

    /// Move the selection cursor down, wrapping at the footer.
    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    /// Move the selection cursor up, wrapping at the top.
    pub fn select_prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    /// Activate the selected item.
    ///
    /// Toggles write into the session's form state; nav rows, links, and the
    /// footer run their action. The returned note, if any, belongs in the
    /// status line.
    pub fn activate(&mut self) -> Result<Option<String>> {
        let Some(entry) = self.entries.get(self.selected).copied() else {
            return Ok(None);
        };
        let note = match entry {
            Selectable::Option { widget, option } => {
                self.toggle_option(widget, option)?;
                None
            }
            Selectable::NavRow { widget, row } => {
                let action = match self.rendered.widgets.get(widget) {
                    Some(Widget::NavList { rows, .. }) => {
                        rows.get(row).and_then(|row| row.action.clone())
                    }
                    _ => None,
                };
                match action {
                    Some(action) => outcome_note(self.session.activate(&action)?),
                    None => None,
                }
            }
            Selectable::OptIn { widget } => {
                if let Some(Widget::OptIn { name, accepted, .. }) =
                    self.rendered.widgets.get(widget)
                {
                    let (name, accepted) = (name.clone(), !*accepted);
                    self.session.set_opt_in(&name, accepted)?;
                }
                None
            }
            Selectable::Link { widget } => {
                let action = match self.rendered.widgets.get(widget) {
                    Some(Widget::Link { on_click, .. }) => on_click.clone(),
                    _ => None,
                };
                match action {
                    Some(action) => outcome_note(self.session.activate(&action)?),
                    None => None,
                }
            }
            Selectable::Field { .. } => {
                Some("Text entry is not supported in the terminal preview".to_string())
            }
            Selectable::Footer => outcome_note(self.session.activate_footer()?),
        };
        self.refresh();
        Ok(note)
    }

    /// Return to the previously shown screen.
    pub fn back(&mut self) -> Result<Option<String>> {
        let note = self
            .session
            .back()?
            .map(|screen| format!("Back to {}", screen.id));
        self.selected = 0;
        self.refresh();
        Ok(note)
    }

    /// Jump to a screen by id, as the graph pane requests.
    pub fn jump_to_screen(&mut self, id: &ScreenId) -> Result<()> {
        let index = self
            .session
            .doc()
            .screen_index(id)
            .ok_or_else(|| RendererError::UnknownScreen(id.clone()))?;
        self.session.jump_to(index)?;
        self.selected = 0;
        self.refresh();
        Ok(())
    }

    /// Discard all progress and return to the first screen.
    pub fn reset(&mut self) {
        self.session.reset();
        self.selected = 0;
        self.refresh();
    }

    fn toggle_option(&mut self, widget: usize, option: usize) -> Result<()> {
        // Names are cloned out before mutating the session; `rendered` is a
        // cache and goes stale the moment the session changes.
        let target = match self.rendered.widgets.get(widget) {
            Some(Widget::CheckboxGroup { name, options, .. }) => options
                .get(option)
                .map(|opt| (Kind::Checkbox, name.clone(), opt.id.clone())),
            Some(Widget::RadioGroup { name, options, .. }) => options
                .get(option)
                .map(|opt| (Kind::Radio, name.clone(), opt.id.clone())),
            Some(Widget::Dropdown { name, options, .. }) => options
                .get(option)
                .map(|opt| (Kind::Dropdown, name.clone(), opt.id.clone())),
            Some(Widget::ChipSelector { name, options, .. }) => options
                .get(option)
                .map(|opt| (Kind::Chip, name.clone(), opt.id.clone())),
            _ => None,
        };
        if let Some((kind, name, option_id)) = target {
            match kind {
                Kind::Checkbox => self.session.toggle_checkbox(&name, &option_id)?,
                Kind::Radio => self.session.select_radio(&name, &option_id)?,
                Kind::Dropdown => self.session.select_dropdown(&name, &option_id)?,
                Kind::Chip => self.session.toggle_chip(&name, &option_id)?,
            }
        }
        Ok(())
    }

    fn refresh(&mut self) {
        self.rendered = self.session.render();
        self.entries = collect_entries(&self.rendered);
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Checkbox,
    Radio,
    Dropdown,
    Chip,
}

/// Flatten the rendered screen into selection order: widgets top to bottom,
/// options within their widget, footer last.
fn collect_entries(rendered: &RenderedScreen) -> Vec<Selectable> {
    let mut entries = Vec::new();
    for (index, widget) in rendered.widgets.iter().enumerate() {
        match widget {
            Widget::CheckboxGroup { options, .. }
            | Widget::RadioGroup { options, .. }
            | Widget::Dropdown { options, .. }
            | Widget::ChipSelector { options, .. } => {
                for option in 0..options.len() {
                    entries.push(Selectable::Option {
                        widget: index,
                        option,
                    });
                }
            }
            Widget::NavList { rows, .. } => {
                for row in 0..rows.len() {
                    entries.push(Selectable::NavRow { widget: index, row });
                }
            }
            Widget::OptIn { .. } => entries.push(Selectable::OptIn { widget: index }),
            Widget::Link { .. } => entries.push(Selectable::Link { widget: index }),
            Widget::TextField { .. } | Widget::TextArea { .. } | Widget::DateField { .. } => {
                entries.push(Selectable::Field { widget: index });
            }
            _ => {}
        }
    }
    entries.push(Selectable::Footer);
    entries
}

fn outcome_note(outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::Navigated(id) => Some(format!("Moved to {}", id)),
        Outcome::Completed { payload } => {
            Some(format!("Flow completed: {}", Value::Object(payload)))
        }
        Outcome::Stayed => None,
    }
}
