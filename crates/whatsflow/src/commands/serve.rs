//! Serve command - runs the WhatsFlow API server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::info;

use whatsflow_client::{GraphApiClient, GraphApiConfig, PlannerClient, PlannerConfig};
use whatsflow_config::WhatsflowConfig;
use whatsflow_server::{AppState, Server};

use super::Context;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides the config file)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Read settings from this file instead of the discovery chain
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let mut config = load_settings(&args, ctx.verbose)?;

    if let Some(ref bind) = args.bind {
        config
            .server
            .get_or_insert_with(Default::default)
            .bind_address = bind.clone();
    }

    config.validate()?;
    let addr = config.server().socket_addr();

    let planner_section = config.planner();
    let planner = PlannerClient::new(
        PlannerConfig::new(&planner_section.base_url)
            .with_timeout(Duration::from_secs(planner_section.timeout_secs)),
    )?;

    // The Graph API client refuses to build without credentials, so a
    // missing token surfaces at startup rather than on the first publish.
    let graph_section = config.graph_api();
    let publisher = GraphApiClient::new(
        GraphApiConfig::new(
            graph_section.waba_id.clone().unwrap_or_default(),
            graph_section.access_token.clone().unwrap_or_default(),
        )
        .with_base_url(&graph_section.base_url)
        .with_timeout(Duration::from_secs(graph_section.timeout_secs)),
    )?;

    if ctx.verbose {
        println!("Planner: {}", planner_section.base_url);
        println!("Graph API: {}", graph_section.base_url);
    }

    info!(
        planner = %planner_section.base_url,
        graph_api = %graph_section.base_url,
        "outbound clients ready"
    );

    let state = AppState::new(config, Arc::new(planner), Arc::new(publisher));
    let server = Server::new(state);

    println!("WhatsFlow server starting on http://{}", addr);
    println!("Stop with Ctrl+C");

    server.run().await?;

    Ok(())
}

/// Resolve server settings from one explicit file or the discovery chain,
/// then let environment variables override either.
fn load_settings(args: &ServeArgs, verbose: bool) -> Result<WhatsflowConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let config = whatsflow_config::load_config_file(path)?;
            if verbose {
                println!("Loaded config: {}", path.display());
            }
            config
        }
        None => {
            let loaded = whatsflow_config::load_config(None)?;
            // Plaintext tokens, unparseable layers, and the like.
            for warning in &loaded.warnings {
                eprintln!("warning: {}", warning);
            }
            if verbose {
                let sources = loaded.loaded_from();
                if sources.is_empty() {
                    println!("No config files found, using defaults + environment");
                }
                for source in sources {
                    println!("Loaded config: {}", source.display());
                }
            }
            loaded.config
        }
    };

    config.apply_env();
    Ok(config)
}
