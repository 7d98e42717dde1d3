//! WhatsFlow command line: draft, generate, preview, and publish WhatsApp
//! Flows against a running WhatsFlow server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

use commands::{chat, generate, graph, playground, preview, publish, serve, status, validate};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8686";

/// WhatsFlow - AI-drafted WhatsApp Flows from plain language
#[derive(Parser)]
#[command(name = "whatsflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print more of what is happening
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    /// WhatsFlow server URL
    #[arg(long, global = true, env = "WHATSFLOW_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the WhatsFlow API server
    Serve(serve::ServeArgs),

    /// Show server status
    Status(status::StatusArgs),

    /// Chat with the flow planner (REPL)
    Chat(chat::ChatArgs),

    /// Generate a flow from the current drafting thread
    Generate(generate::GenerateArgs),

    /// Publish a created flow on the WhatsApp Business Account
    Publish(publish::PublishArgs),

    /// Validate a flow document
    Validate(validate::ValidateArgs),

    /// Render a flow document's screens to the terminal
    Preview(preview::PreviewArgs),

    /// Derive and lay out the editor graph for a flow document
    Graph(graph::GraphArgs),

    /// Launch the terminal playground
    Playground(playground::PlaygroundArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, matches!(cli.command, Commands::Playground(_)));

    let ctx = commands::Context {
        server_url: cli.server.unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Serve(args) => serve::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Generate(args) => generate::run(args, &ctx).await,
        Commands::Publish(args) => publish::run(args, &ctx).await,
        Commands::Validate(args) => validate::run(args, &ctx),
        Commands::Preview(args) => preview::run(args, &ctx),
        Commands::Graph(args) => graph::run(args, &ctx),
        Commands::Playground(args) => playground::run(args, &ctx).await,
    }
}

/// Console layer plus a rotating JSON file under the config dir. The
/// playground owns the terminal and gets the file layer only.
fn init_tracing(verbose: bool, quiet_console: bool) -> WorkerGuard {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let console_filter = if verbose {
        "whatsflow=debug,whatsflow_server=debug,whatsflow_client=debug,whatsflow_store=debug,whatsflow_config=debug,info"
    } else {
        "whatsflow=info,whatsflow_server=info,whatsflow_client=info,warn"
    };
    let file_filter = "whatsflow=trace,whatsflow_server=trace,whatsflow_client=trace,whatsflow_store=trace,whatsflow_config=trace,info";

    let log_dir = whatsflow_config::xdg_config_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "whatsflow.log"));

    let console = (!quiet_console).then(|| {
        fmt::layer()
            .with_target(true)
            .with_filter(EnvFilter::new(console_filter))
    });

    tracing_subscriber::registry()
        .with(console)
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(file_filter)),
        )
        .init();

    guard
}
