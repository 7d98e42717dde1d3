//! WhatsFlow terminal playground.
//!
//! A keyboard-driven front end for the drafting loop: chat with the planner
//! on the left, watch the flow graph in the center, and walk the screens in
//! the preview pane on the right.

pub mod app;
pub mod events;
pub mod focus;
pub mod input;
pub mod preview;
pub mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{cursor, execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use app::App;

/// The terminal the playground draws to.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Configuration for running the playground.
pub struct TuiConfig {
    /// Server URL to connect to.
    pub server_url: String,
    /// Flow document to load into the preview pane.
    pub flow_path: Option<PathBuf>,
    /// Playground store location. Defaults to the shared data directory.
    pub store_path: Option<PathBuf>,
}

impl TuiConfig {
    /// Point the playground at a server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            flow_path: None,
            store_path: None,
        }
    }

    /// Load a flow document into the preview pane at startup.
    pub fn with_flow(mut self, path: impl Into<PathBuf>) -> Self {
        self.flow_path = Some(path.into());
        self
    }

    /// Keep playground state somewhere other than the default.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }
}

/// Run the playground until the user quits.
///
/// Does not install a tracing subscriber. Console output would tear the
/// alternate screen, so the caller decides where log events go.
pub async fn run(config: TuiConfig) -> Result<()> {
    // Open the store and parse any flow file before touching the terminal,
    // so setup failures print as ordinary errors.
    let mut app = App::new(config)?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = reset_terminal();
        default_hook(info);
    }));

    let mut tui = claim_terminal()?;
    let outcome = app.run(&mut tui).await;
    reset_terminal()?;
    outcome
}

/// Switch to raw mode on the alternate screen.
fn claim_terminal() -> Result<Tui> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

/// Hand the terminal back. Also runs from the panic hook, where no [`Tui`]
/// handle is in reach, so it works on raw stdout.
fn reset_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
