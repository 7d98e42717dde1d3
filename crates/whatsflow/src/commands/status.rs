//! Status command - asks the server how it is doing.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status report for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    running: bool,
    status: Option<String>,
    version: Option<String>,
    server_url: String,
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let probe = ctx.client()?.health().await;

    if ctx.json {
        let health = probe.as_ref().ok();
        let output = StatusOutput {
            running: health.is_some(),
            status: health.map(|h| h.status.clone()),
            version: health.and_then(|h| h.version.clone()),
            server_url: ctx.server_url.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("WhatsFlow Server Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    match &probe {
        Ok(health) => {
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                style("● running").green()
            );
            if let Some(version) = &health.version {
                println!("  {} {}", dim.apply_to("Version:"), version);
            }
            println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);
        }
        Err(error) => {
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                style("● not running").red()
            );
            println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);
            if ctx.verbose {
                println!();
                println!("  {} {}", dim.apply_to("Error:"), error);
            }
            println!();
            println!("  {}", dim.apply_to("Start it with: whatsflow serve"));
        }
    }
    println!();

    Ok(())
}
