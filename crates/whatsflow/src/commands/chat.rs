//! Chat command - interactive drafting REPL.

use anyhow::{Context as _, Result};
use clap::Args;

use whatsflow_store::PlaygroundStore;
use whatsflow_types::ThreadId;

use super::Context;
use super::repl::Repl;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Resume a specific drafting thread
    #[arg(short, long)]
    pub thread: Option<String>,

    /// Force start a new thread
    #[arg(short, long)]
    pub new: bool,
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let store_path = whatsflow_config::default_store_path();
    let store = PlaygroundStore::open(&store_path)
        .with_context(|| format!("opening playground store at {}", store_path.display()))?;

    // Explicit flag wins, then the saved thread; --new forgets both.
    let thread_id = if args.new {
        None
    } else {
        match args.thread {
            Some(id) => Some(ThreadId::from(id)),
            None => store.thread_id()?,
        }
    };

    Repl::new(ctx.client()?, store, thread_id, ctx.verbose)?
        .run()
        .await
}
