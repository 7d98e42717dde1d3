//! Playground command - launch the interactive terminal playground.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use whatsflow_tui::TuiConfig;

use super::Context;

/// Arguments for the playground command.
#[derive(Args, Debug)]
pub struct PlaygroundArgs {
    /// Flow document to load into the preview pane
    #[arg(short, long)]
    pub flow: Option<PathBuf>,

    /// Playground store location
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// Run the playground command.
pub async fn run(args: PlaygroundArgs, ctx: &Context) -> Result<()> {
    let mut config = TuiConfig::new(&ctx.server_url);
    if let Some(flow) = args.flow {
        config = config.with_flow(flow);
    }
    if let Some(store) = args.store {
        config = config.with_store_path(store);
    }

    whatsflow_tui::run(config).await
}
