//! CLI command handlers.

use anyhow::Result;
use whatsflow_client::WhatsflowClient;

pub mod chat;
pub mod generate;
pub mod graph;
pub mod playground;
pub mod preview;
pub mod publish;
pub mod repl;
pub mod serve;
pub mod status;
pub mod validate;

/// Global flags, resolved once in `main` and handed to every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Base URL of the WhatsFlow server.
    pub server_url: String,
    /// Machine-readable output requested.
    pub json: bool,
    /// Extra diagnostics requested.
    pub verbose: bool,
}

impl Context {
    /// A service client pointed at the configured server.
    pub fn client(&self) -> Result<WhatsflowClient> {
        Ok(WhatsflowClient::new(&self.server_url)?)
    }
}
