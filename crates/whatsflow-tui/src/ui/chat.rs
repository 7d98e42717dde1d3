//! Chat transcript rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use whatsflow_types::ChatRole;

use crate::app::App;

/// Waiting indicator, one frame per tick.
const SPINNER: [char; 4] = ['⠇', '⠋', '⠙', '⠸'];

/// Render the transcript, or the welcome text before the first message.
pub fn render_chat(app: &App, frame: &mut Frame, area: Rect) {
    if app.transcript.is_empty() {
        frame.render_widget(welcome(), area);
        return;
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in &app.transcript {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        match message.role {
            ChatRole::User => lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::raw(message.content.clone()),
            ])),
            _ => lines.extend(
                message
                    .content
                    .lines()
                    .map(|text| Line::styled(text.to_string(), Style::default().fg(Color::Gray))),
            ),
        }
    }
    if app.waiting {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("{} thinking", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Pinned to the newest line unless the user scrolled away.
    let overflow = lines.len().saturating_sub(area.height as usize);
    let offset = if app.chat_auto_scroll {
        overflow
    } else {
        app.chat_scroll.min(overflow)
    };

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((offset as u16, 0)),
        area,
    );
}

fn welcome() -> Paragraph<'static> {
    let mut lines = vec![
        Line::default(),
        Line::styled(
            " WhatsFlow playground",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::raw(" Describe the flow you want and press"),
        Line::raw(" Enter to send. When the plan looks right,"),
        Line::raw(" press Ctrl+G to create the flow."),
        Line::default(),
        Line::styled(" Keys", Style::default().add_modifier(Modifier::BOLD)),
    ];
    lines.extend(
        [
            ("Tab", "switch panes"),
            ("Ctrl+G", "generate the flow"),
            ("Ctrl+L", "toggle layout direction"),
            ("Ctrl+R", "reset the preview"),
            ("Ctrl+C", "quit"),
        ]
        .into_iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("   {:<7}", key), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {}", what)),
            ])
        }),
    );
    Paragraph::new(lines).wrap(Wrap { trim: false })
}
