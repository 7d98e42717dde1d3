//! Generate command - one-shot flow generation from a drafting thread.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use console::Style;
use indicatif::ProgressBar;
use serde::Serialize;

use whatsflow_store::PlaygroundStore;
use whatsflow_types::ThreadId;

use super::Context;

/// Arguments for the generate command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Drafting thread to generate from (default: the saved playground thread)
    #[arg(short, long)]
    pub thread: Option<String>,

    /// Write the editor graph JSON to a file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Generation result for JSON output.
#[derive(Debug, Serialize)]
struct GenerateOutput {
    success: bool,
    thread_id: String,
    flow_id: String,
    preview_url: Option<String>,
}

/// Run the generate command.
pub async fn run(args: GenerateArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let store_path = whatsflow_config::default_store_path();
    let store = PlaygroundStore::open(&store_path)
        .with_context(|| format!("opening playground store at {}", store_path.display()))?;

    let thread_id = match args.thread {
        Some(id) => ThreadId::from(id),
        None => match store.thread_id()? {
            Some(id) => id,
            None => bail!("No drafting thread yet. Chat first with: whatsflow chat"),
        },
    };

    let dim = Style::new().dim();
    if ctx.verbose {
        println!("{}", dim.apply_to(format!("Thread: {}", thread_id)));
        println!("{}", dim.apply_to(format!("Server: {}", ctx.server_url)));
    }

    // Drafting plus Graph API creation can take a while
    let spinner = (!ctx.json).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Generating flow...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    });

    let result = client.generate_flow(&thread_id).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let generation = result?;

    if let Err(error) = store.set_flow_id(&generation.flow_id) {
        eprintln!("warning: failed to persist flow id: {}", error);
    }

    if let Some(ref path) = args.out {
        let json = serde_json::to_string_pretty(&generation.react_json)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if ctx.json {
        let output = GenerateOutput {
            success: generation.success,
            thread_id: generation.thread_id.to_string(),
            flow_id: generation.flow_id.to_string(),
            preview_url: generation.preview_url.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let green = Style::new().green();
        println!(
            "{} Flow created: {}",
            green.apply_to("✓"),
            generation.flow_id
        );
        match generation.preview_url {
            Some(ref url) => println!("  {} {}", dim.apply_to("Preview:"), url),
            None => println!("  {}", dim.apply_to("(no preview URL returned)")),
        }
        if let Some(ref path) = args.out {
            println!("  {} {}", dim.apply_to("Graph:"), path.display());
        }
    }

    Ok(())
}
