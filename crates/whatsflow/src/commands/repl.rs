//! Interactive drafting loop behind the chat command.

use std::time::Duration;

use anyhow::Result;
use console::{Style, Term, style};
use indicatif::ProgressBar;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use serde_json::Value;

use whatsflow_client::WhatsflowClient;
use whatsflow_store::PlaygroundStore;
use whatsflow_types::{FlowId, ThreadId};

/// Slash commands, in help-screen order.
const COMMANDS: &[(&str, &str)] = &[
    ("/help, /h, /?", "show this help"),
    ("/status", "probe the server"),
    ("/thread", "show the drafting thread id"),
    ("/new", "start a fresh drafting thread"),
    ("/generate", "create the flow from this thread"),
    ("/publish [id]", "publish the last created flow"),
    ("/clear", "clear the screen"),
    ("/quit, /q", "leave"),
];

/// Whether the loop keeps going after a line.
enum Flow {
    Stay,
    Quit,
}

/// Line-oriented drafting client over the playground store.
pub struct Repl {
    client: WhatsflowClient,
    store: PlaygroundStore,
    thread_id: Option<ThreadId>,
    last_flow: Option<FlowId>,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
}

impl Repl {
    pub fn new(
        client: WhatsflowClient,
        store: PlaygroundStore,
        thread_id: Option<ThreadId>,
        verbose: bool,
    ) -> Result<Self> {
        let editor = Editor::with_config(
            Config::builder()
                .history_ignore_space(true)
                .auto_add_history(true)
                .build(),
        )?;
        let last_flow = store.flow_id()?;

        Ok(Self {
            client,
            store,
            thread_id,
            last_flow,
            editor,
            term: Term::stdout(),
            verbose,
        })
    }

    /// Read lines until /quit or Ctrl+D.
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();
        let prompt = format!("{} ", style("whatsflow>").cyan().bold());

        loop {
            match self.editor.readline(&prompt) {
                Ok(line) => match self.handle_line(line.trim()).await {
                    Ok(Flow::Stay) => {}
                    Ok(Flow::Quit) => break,
                    Err(error) => self.fail(&error.to_string()),
                },
                // Ctrl+C drops the line, not the session.
                Err(ReadlineError::Interrupted) => {
                    self.note("(interrupted, /quit to leave)");
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Stay);
        }
        if let Some(command) = line.strip_prefix('/') {
            let (name, rest) = command
                .split_once(char::is_whitespace)
                .unwrap_or((command, ""));
            return self.dispatch(name, rest.trim()).await;
        }
        self.send_message(line).await?;
        Ok(Flow::Stay)
    }

    async fn dispatch(&mut self, name: &str, rest: &str) -> Result<Flow> {
        match name {
            "quit" | "q" | "exit" => return Ok(Flow::Quit),
            "help" | "h" | "?" => self.print_help(),
            "clear" | "cls" => self.term.clear_screen()?,
            "status" => self.print_status().await,
            "thread" => match &self.thread_id {
                Some(id) => println!("Drafting thread: {}", id),
                None => self.note("No thread yet; the first message starts one"),
            },
            "new" => {
                let id = ThreadId::new();
                if let Err(error) = self.store.set_thread_id(&id) {
                    eprintln!("warning: failed to persist thread: {}", error);
                }
                self.thread_id = Some(id);
                self.note("Started a fresh drafting thread");
            }
            "generate" => self.generate_flow().await,
            "publish" => self.publish_flow(rest).await,
            _ => {
                self.fail(&format!("unknown command /{}", name));
                self.note("/help lists what works here");
            }
        }
        Ok(Flow::Stay)
    }

    /// One drafting turn: send, wait, print the reply.
    async fn send_message(&mut self, message: &str) -> Result<()> {
        let thread = self.ensure_thread();
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        let reply = self.client.chat(&thread, message).await;
        spinner.finish_and_clear();

        println!("{}", assistant_text(&reply?));
        println!();
        Ok(())
    }

    /// The drafting thread, minted and persisted on first use.
    fn ensure_thread(&mut self) -> ThreadId {
        if let Some(id) = &self.thread_id {
            return id.clone();
        }
        let id = ThreadId::new();
        if let Err(error) = self.store.set_thread_id(&id) {
            eprintln!("warning: failed to persist thread: {}", error);
        }
        self.note(&format!("Thread: {}", id));
        self.thread_id = Some(id.clone());
        id
    }

    async fn generate_flow(&mut self) {
        let thread = self.ensure_thread();
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Generating flow...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        let result = self.client.generate_flow(&thread).await;
        spinner.finish_and_clear();

        match result {
            Ok(generation) => {
                println!(
                    "{} Flow created: {}",
                    style("✓").green(),
                    generation.flow_id
                );
                match &generation.preview_url {
                    Some(url) => println!("  Preview: {}", url),
                    None => self.note("  (no preview URL returned)"),
                }
                if let Err(error) = self.store.set_flow_id(&generation.flow_id) {
                    eprintln!("warning: failed to persist flow id: {}", error);
                }
                self.last_flow = Some(generation.flow_id);
            }
            Err(error) => self.fail(&format!("flow generation failed: {}", error)),
        }
    }

    /// `/publish` with no id falls back to the last generated flow.
    async fn publish_flow(&mut self, id: &str) {
        let flow_id = if id.is_empty() {
            match self.last_flow.clone() {
                Some(id) => id,
                None => {
                    self.note("Nothing to publish; /generate first or pass an id");
                    return;
                }
            }
        } else {
            FlowId::from(id)
        };

        match self.client.publish_flow(&flow_id).await {
            Ok(published) => println!(
                "{} Flow published: {}",
                style("✓").green(),
                published.flow_id
            ),
            Err(error) => self.fail(&format!("publish failed: {}", error)),
        }
    }

    async fn print_status(&self) {
        match self.client.health().await {
            Ok(health) => println!("Server: {} ({})", style("● up").green(), health.status),
            Err(error) => {
                println!("Server: {}", style("● down").red());
                if self.verbose {
                    self.note(&format!("  {}", error));
                }
            }
        }
    }

    fn print_banner(&self) {
        println!();
        println!("{}", style("WhatsFlow drafting chat").cyan().bold());
        self.note("Describe the flow you want, one message at a time.");
        self.note("/generate turns the thread into a real flow. /help for the rest.");
        println!();
    }

    fn print_help(&self) {
        println!();
        for (name, what) in COMMANDS {
            println!("  {} {}", style(format!("{:<16}", name)).cyan(), what);
        }
        println!();
    }

    /// Dimmed side-channel text, as opposed to planner output.
    fn note(&self, text: &str) {
        println!("{}", Style::new().dim().apply_to(text));
    }

    fn fail(&self, text: &str) {
        println!("{} {}", Style::new().red().apply_to("error:"), text);
    }
}

/// The planner's reply shape is not pinned down; well-known message fields
/// win, anything else prints as compact JSON.
fn assistant_text(reply: &Value) -> String {
    if let Some(text) = reply.as_str() {
        return text.to_string();
    }
    for key in ["response", "reply", "message", "content", "output"] {
        if let Some(text) = reply.get(key).and_then(Value::as_str) {
            return text.to_string();
        }
    }
    reply.to_string()
}
