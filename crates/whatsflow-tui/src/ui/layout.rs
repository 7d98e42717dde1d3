//! Top-level frame layout.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, ServerHealth};
use crate::focus::Focus;
use crate::ui::chat::render_chat;
use crate::ui::graph::render_graph;
use crate::ui::input::render_input;
use crate::ui::preview::render_preview;

/// Render the whole frame.
pub fn render(app: &App, frame: &mut Frame) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(app, frame, header);
    render_panes(app, frame, body);
    render_status_bar(app, frame, status);
}

/// The three columns: chat, graph, preview.
fn render_panes(app: &App, frame: &mut Frame, area: Rect) {
    let [chat, graph, preview] = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .areas(area);

    render_chat_pane(app, frame, chat);
    render_graph(app, frame, graph);
    render_preview(app, frame, preview);
}

/// Transcript on top of the input row, inside one bordered pane.
fn render_chat_pane(app: &App, frame: &mut Frame, area: Rect) {
    let block = super::pane_block(" chat ", app.focus == Focus::Chat);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [transcript, input] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);
    render_chat(app, frame, transcript);
    render_input(app, frame, input);
}

/// One line across the top: app name on the left, live state on the right.
fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let (probe, probe_color) = match app.server_health {
        ServerHealth::Reachable => ("●", Color::Green),
        ServerHealth::Unreachable => ("○", Color::Red),
        ServerHealth::Unknown => ("◐", Color::Yellow),
    };

    let mut right = vec![
        Span::styled(format!("{} ", probe), Style::default().fg(probe_color)),
        tag("thread", short_id(app.thread_id.as_str()).to_string()),
    ];
    if let Some(flow_id) = &app.flow_id {
        right.push(tag("flow", flow_id.to_string()));
    }
    right.push(tag("dir", app.direction.as_str().to_string()));

    let title = Span::styled(" whatsflow ", Style::default().add_modifier(Modifier::BOLD));
    let used = title.width() + right.iter().map(Span::width).sum::<usize>();
    let rule = Span::raw("─".repeat((area.width as usize).saturating_sub(used)));

    let mut spans = vec![title, rule];
    spans.append(&mut right);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

/// A dimmed `key:value ` chunk for the header's right side.
fn tag(label: &str, value: String) -> Span<'static> {
    Span::styled(
        format!("{}:{} ", label, value),
        Style::default().fg(Color::DarkGray),
    )
}

/// One line across the bottom: progress or key hints on the left, the
/// hosted preview URL on the right.
fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let left = match &app.status_message {
        Some(message) => message.clone(),
        None if app.generating => "Generating flow...".to_string(),
        None if app.waiting => "Thinking...".to_string(),
        None => key_hints(app.focus).to_string(),
    };
    let right = app.preview_url.as_deref().unwrap_or("");

    let gap = (area.width as usize)
        .saturating_sub(left.chars().count() + right.chars().count() + 1);
    let line = Line::styled(
        format!("{}{}{} ", left, " ".repeat(gap), right),
        Style::default().fg(Color::DarkGray),
    );
    frame.render_widget(Paragraph::new(line), area);
}

/// What the keyboard does in the focused pane.
fn key_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Chat => "Tab pane │ Enter send │ ^G generate │ ^C quit",
        Focus::Graph => "↑↓ node │ Enter preview │ ^L direction │ ^G generate │ q quit",
        Focus::Preview => "↑↓ select │ Enter activate │ Bksp back │ ^R reset │ q quit",
    }
}

/// The leading chunk of a uuid, enough to tell threads apart.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
