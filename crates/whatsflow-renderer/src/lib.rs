//! Flow preview rendering.
//!
//! Turns flow documents into rendered screens a front end can draw, and
//! drives interactive preview sessions: form input, option selection,
//! navigation, and payload interpolation, matching what a WhatsApp client
//! does with the published flow.

pub mod error;
pub mod render;
pub mod session;
pub mod widget;

pub use error::{RendererError, Result};
pub use render::{init_values, next_screen, render_screen};
pub use session::{ExchangeRecord, Outcome, PreviewSession};
pub use widget::{AnswerValue, FooterButton, NavRow, RenderedScreen, ScreenAnswers, Widget};
