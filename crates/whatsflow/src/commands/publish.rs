//! Publish command - move a drafted flow out of DRAFT on WhatsApp.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use whatsflow_types::FlowId;

use super::Context;

/// Arguments for the publish command.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Flow id to publish
    pub flow_id: String,
}

/// Publish result for JSON output.
#[derive(Debug, Serialize)]
struct PublishOutput {
    success: bool,
    flow_id: String,
}

/// Run the publish command.
pub async fn run(args: PublishArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let flow_id = FlowId::from(args.flow_id);

    if ctx.verbose {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(format!("Server: {}", ctx.server_url)));
    }

    let published = client.publish_flow(&flow_id).await?;

    if ctx.json {
        let output = PublishOutput {
            success: published.success,
            flow_id: published.flow_id.to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let green = Style::new().green();
        println!(
            "{} Flow published: {}",
            green.apply_to("✓"),
            published.flow_id
        );
    }

    Ok(())
}
