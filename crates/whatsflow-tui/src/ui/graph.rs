//! Flow graph rendering.
//!
//! The center pane sketches the editor graph on a ratatui canvas: one box
//! per screen at its stored editor position, edges between box centers.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{
        Paragraph, Wrap,
        canvas::{Canvas, Line as CanvasLine, Rectangle},
    },
};
use whatsflow_graph::{NODE_HEIGHT, NODE_WIDTH};

use crate::app::App;
use crate::focus::Focus;

/// Breathing room around the drawing, in editor units.
const MARGIN: f64 = 24.0;

/// Longest label that still fits a node box.
const LABEL_WIDTH: usize = 18;

/// Render the flow graph canvas.
pub fn render_graph(app: &App, frame: &mut Frame, area: Rect) {
    let block = super::pane_block(" graph ", app.focus == Focus::Graph);

    if app.graph.nodes.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No flow yet.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " Chat about what you need, then press",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                " Ctrl+G to generate.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: false })
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Bounding box over the node boxes, in editor coordinates.
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for node in &app.graph.nodes {
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_x = max_x.max(node.position.x + NODE_WIDTH);
        max_y = max_y.max(node.position.y + NODE_HEIGHT);
    }

    // Editor y grows downward, canvas y grows upward.
    let flip = move |y: f64| min_y + max_y - y;

    let selected = app.selected_node;
    let canvas = Canvas::default()
        .block(block)
        .x_bounds([min_x - MARGIN, max_x + MARGIN])
        .y_bounds([min_y - MARGIN, max_y + MARGIN])
        .paint(|ctx| {
            for edge in &app.graph.edges {
                let (Some(source), Some(target)) =
                    (app.graph.node(&edge.source), app.graph.node(&edge.target))
                else {
                    continue;
                };
                ctx.draw(&CanvasLine {
                    x1: source.position.x + NODE_WIDTH / 2.0,
                    y1: flip(source.position.y + NODE_HEIGHT / 2.0),
                    x2: target.position.x + NODE_WIDTH / 2.0,
                    y2: flip(target.position.y + NODE_HEIGHT / 2.0),
                    color: Color::DarkGray,
                });
            }

            // Boxes and labels sit above the edge lines.
            ctx.layer();

            for (index, node) in app.graph.nodes.iter().enumerate() {
                let color = if index == selected {
                    Color::Yellow
                } else {
                    Color::Cyan
                };
                ctx.draw(&Rectangle {
                    x: node.position.x,
                    y: flip(node.position.y + NODE_HEIGHT),
                    width: NODE_WIDTH,
                    height: NODE_HEIGHT,
                    color,
                });
                ctx.print(
                    node.position.x + 8.0,
                    flip(node.position.y + NODE_HEIGHT / 2.0),
                    Line::from(Span::styled(
                        clip_label(&node.label),
                        Style::default().fg(color),
                    )),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn clip_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        label.to_string()
    } else {
        let clipped: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{}…", clipped)
    }
}
