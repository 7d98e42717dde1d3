//! UI rendering components.

pub mod chat;
pub mod graph;
pub mod input;
mod layout;
pub mod preview;

pub use layout::render;

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

/// The bordered box around a pane, highlighted while focused.
fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}
