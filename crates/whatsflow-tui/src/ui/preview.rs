//! Screen preview rendering.
//!
//! Draws the rendered screen as styled lines with a selection marker, the
//! way the hosted preview draws it as a phone frame. The pane state and its
//! mutations live in `crate::preview`.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use whatsflow_renderer::{NavRow, Widget};

use crate::app::App;
use crate::focus::Focus;
use crate::preview::{PreviewPane, Selectable};

/// Render the interactive screen preview.
pub fn render_preview(app: &App, frame: &mut Frame, area: Rect) {
    let block = super::pane_block(" preview ", app.focus == Focus::Preview);

    let Some(pane) = app.preview.as_ref() else {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No flow document loaded.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " Start the playground with --flow FILE",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                " to walk the screens here.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: false })
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let (lines, selected_line) = screen_lines(pane);

    // Keep the selected row in view. -2 for the pane border.
    let view_height = area.height.saturating_sub(2) as usize;
    let scroll = match selected_line {
        Some(line) if line + 1 > view_height => line + 1 - view_height,
        _ => 0,
    };

    let content = Paragraph::new(lines).block(block).scroll((scroll as u16, 0));
    frame.render_widget(content, area);
}

/// The rendered screen as styled lines, plus the line index of the selected
/// entry for scrolling.
fn screen_lines(pane: &PreviewPane) -> (Vec<Line<'static>>, Option<usize>) {
    let rendered = pane.rendered();
    let selection = pane.selection().copied();
    let mut lines = Vec::new();
    let mut selected_line = None;

    lines.push(Line::from(Span::styled(
        format!(" {}", rendered.title),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if pane.is_completed() {
        lines.push(Line::from(Span::styled(
            " Flow completed",
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));

    for (index, widget) in rendered.widgets.iter().enumerate() {
        widget_lines(widget, index, selection, &mut lines, &mut selected_line);
        lines.push(Line::from(""));
    }

    let footer_selected = selection == Some(Selectable::Footer);
    if footer_selected {
        selected_line = Some(lines.len());
    }
    lines.push(Line::from(Span::styled(
        format!(
            "{}[ {} ]",
            marker(footer_selected),
            rendered.footer.label
        ),
        entry_style(footer_selected).add_modifier(Modifier::BOLD),
    )));

    (lines, selected_line)
}

fn widget_lines(
    widget: &Widget,
    index: usize,
    selection: Option<Selectable>,
    lines: &mut Vec<Line<'static>>,
    selected_line: &mut Option<usize>,
) {
    match widget {
        Widget::Heading { text } => {
            lines.push(Line::from(Span::styled(
                format!(" {}", text),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Widget::Subheading { text } => {
            lines.push(Line::from(Span::styled(
                format!(" {}", text),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        Widget::Body { text, .. } | Widget::RichText { text } => {
            for part in text.lines() {
                lines.push(Line::from(Span::styled(
                    format!(" {}", part),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        Widget::Caption { text } => {
            lines.push(Line::from(Span::styled(
                format!(" {}", text),
                Style::default().fg(Color::DarkGray),
            )));
        }
        Widget::TextField {
            label,
            value,
            required,
            ..
        }
        | Widget::TextArea {
            label,
            value,
            required,
            ..
        } => {
            let selected = selection == Some(Selectable::Field { widget: index });
            field_line(label, value, *required, selected, lines, selected_line);
        }
        Widget::DateField { label, value, .. } => {
            let selected = selection == Some(Selectable::Field { widget: index });
            field_line(label, value, false, selected, lines, selected_line);
        }
        Widget::CheckboxGroup {
            label,
            options,
            selected: chosen,
            ..
        }
        | Widget::ChipSelector {
            label,
            options,
            selected: chosen,
            ..
        } => {
            group_label(label, lines);
            for (option, opt) in options.iter().enumerate() {
                let text = format!("[{}] {}", tick(chosen.contains(&opt.id)), opt.title);
                option_line(index, option, selection, text, lines, selected_line);
            }
        }
        Widget::RadioGroup {
            label,
            options,
            selected: chosen,
            ..
        }
        | Widget::Dropdown {
            label,
            options,
            selected: chosen,
            ..
        } => {
            group_label(label, lines);
            for (option, opt) in options.iter().enumerate() {
                let marked = chosen.as_deref() == Some(opt.id.as_str());
                let text = format!("({}) {}", dot(marked), opt.title);
                option_line(index, option, selection, text, lines, selected_line);
            }
        }
        Widget::OptIn {
            label, accepted, ..
        } => {
            let selected = selection == Some(Selectable::OptIn { widget: index });
            if selected {
                *selected_line = Some(lines.len());
            }
            let text = label.as_deref().unwrap_or("I agree");
            lines.push(Line::from(Span::styled(
                format!("{}[{}] {}", marker(selected), tick(*accepted), text),
                entry_style(selected),
            )));
        }
        Widget::Link { text, .. } => {
            let selected = selection == Some(Selectable::Link { widget: index });
            if selected {
                *selected_line = Some(lines.len());
            }
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker(selected), text),
                entry_style(selected).add_modifier(Modifier::UNDERLINED),
            )));
        }
        Widget::NavList { rows, .. } => {
            for (row_index, row) in rows.iter().enumerate() {
                nav_row_lines(index, row_index, row, selection, lines, selected_line);
            }
        }
    }
}

fn field_line(
    label: &Option<String>,
    value: &Option<String>,
    required: bool,
    selected: bool,
    lines: &mut Vec<Line<'static>>,
    selected_line: &mut Option<usize>,
) {
    if selected {
        *selected_line = Some(lines.len());
    }
    let name = label.as_deref().unwrap_or("Input");
    let suffix = if required { "*" } else { "" };
    let shown = match value {
        Some(value) if !value.is_empty() => value.clone(),
        _ => "____".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}{}{}: ", marker(selected), name, suffix),
            entry_style(selected),
        ),
        Span::styled(shown, Style::default().fg(Color::Gray)),
    ]));
}

fn option_line(
    widget: usize,
    option: usize,
    selection: Option<Selectable>,
    text: String,
    lines: &mut Vec<Line<'static>>,
    selected_line: &mut Option<usize>,
) {
    let selected = selection == Some(Selectable::Option { widget, option });
    if selected {
        *selected_line = Some(lines.len());
    }
    lines.push(Line::from(Span::styled(
        format!("{}{}", marker(selected), text),
        entry_style(selected),
    )));
}

fn nav_row_lines(
    widget: usize,
    row_index: usize,
    row: &NavRow,
    selection: Option<Selectable>,
    lines: &mut Vec<Line<'static>>,
    selected_line: &mut Option<usize>,
) {
    let selected = selection
        == Some(Selectable::NavRow {
            widget,
            row: row_index,
        });
    if selected {
        *selected_line = Some(lines.len());
    }

    let mut spans = vec![Span::styled(
        format!("{}{}", marker(selected), row.title),
        entry_style(selected),
    )];
    if let Some(end) = &row.end_title {
        spans.push(Span::styled(
            format!("  {}", end),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(" ›", Style::default().fg(Color::DarkGray)));
    lines.push(Line::from(spans));

    if let Some(metadata) = &row.metadata {
        lines.push(Line::from(Span::styled(
            format!("    {}", metadata),
            Style::default().fg(Color::DarkGray),
        )));
    }
}

fn group_label(label: &Option<String>, lines: &mut Vec<Line<'static>>) {
    if let Some(label) = label {
        lines.push(Line::from(Span::styled(
            format!(" {}", label),
            Style::default().fg(Color::Gray),
        )));
    }
}

fn marker(selected: bool) -> &'static str {
    if selected { "▸ " } else { "  " }
}

fn entry_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn tick(marked: bool) -> char {
    if marked { 'x' } else { ' ' }
}

fn dot(marked: bool) -> char {
    if marked { '•' } else { ' ' }
}
