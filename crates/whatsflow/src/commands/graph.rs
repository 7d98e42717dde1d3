//! Graph command - derive and lay out the editor graph for a flow document.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use console::Style;

use whatsflow_flow::FlowDocument;
use whatsflow_graph::{Direction, derive_graph, layout};

use super::Context;

/// Arguments for the graph command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Flow document to derive the graph from
    pub file: PathBuf,

    /// Layout direction (tb, lr)
    #[arg(short, long, default_value = "tb")]
    pub direction: String,

    /// Write the graph to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Run the graph command.
pub fn run(args: GraphArgs, ctx: &Context) -> Result<()> {
    let direction = parse_direction(&args.direction)?;

    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc = FlowDocument::from_json(&json)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let mut graph = derive_graph(&doc);
    layout(&mut graph, direction);

    let pretty = serde_json::to_string_pretty(&graph)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, pretty)
                .with_context(|| format!("writing {}", path.display()))?;
            if ctx.json {
                let output = serde_json::json!({
                    "path": path.display().to_string(),
                    "nodes": graph.nodes.len(),
                    "edges": graph.edges.len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let green = Style::new().green();
                println!(
                    "{} Graph written: {} ({} nodes, {} edges)",
                    green.apply_to("✓"),
                    path.display(),
                    graph.nodes.len(),
                    graph.edges.len()
                );
            }
        }
        None => println!("{}", pretty),
    }

    Ok(())
}

fn parse_direction(s: &str) -> Result<Direction> {
    match s.to_lowercase().as_str() {
        "tb" | "top-bottom" => Ok(Direction::TopBottom),
        "lr" | "left-right" => Ok(Direction::LeftRight),
        _ => bail!("unknown direction '{}'. Valid options: tb, lr", s),
    }
}
