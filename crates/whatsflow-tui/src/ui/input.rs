//! Chat input rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::focus::Focus;

/// Render the single-line chat input.
pub fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = input_block.inner(area);
    frame.render_widget(input_block, area);

    let prompt_style = if app.waiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let line = Line::from(vec![
        Span::styled("> ", prompt_style),
        Span::raw(app.input.content()),
    ]);

    // Long input scrolls left so the cursor stays on screen. +2 for the
    // prompt "> ".
    let cursor_col = 2 + app.input.cursor_column() as u16;
    let h_scroll = cursor_col.saturating_sub(inner.width.saturating_sub(1));
    frame.render_widget(Paragraph::new(line).scroll((0, h_scroll)), inner);

    // The terminal cursor belongs to the chat input only while it has focus
    // and no turn is in flight.
    if app.focus == Focus::Chat && !app.waiting {
        frame.set_cursor_position((inner.x + cursor_col - h_scroll, inner.y));
    }
}
