//! Playground state and the loop that drives it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use whatsflow_client::{FlowGeneration, WhatsflowClient};
use whatsflow_flow::FlowDocument;
use whatsflow_graph::{Direction, GraphDocument, derive_graph, layout};
use whatsflow_store::PlaygroundStore;
use whatsflow_types::{ChatMessage, FlowId, ScreenId, ThreadId};

use crate::events::{AppEvent, Event, EventPump};
use crate::focus::Focus;
use crate::input::InputState;
use crate::preview::PreviewPane;
use crate::ui;
use crate::{Tui, TuiConfig};

/// How often the background task re-checks the server.
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Server reachability, shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerHealth {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// Everything the playground tracks between frames.
pub struct App {
    /// Server URL the playground talks to.
    pub server_url: String,
    /// Pane receiving unmodified keys.
    pub focus: Focus,
    /// Set when the user asks to leave.
    pub should_quit: bool,
    /// The chat line being edited.
    pub input: InputState,
    /// Chat transcript, oldest first.
    pub transcript: Vec<ChatMessage>,
    /// Lines scrolled from the top of the transcript.
    pub chat_scroll: usize,
    /// Whether to keep the chat pinned to the bottom.
    pub chat_auto_scroll: bool,
    /// Whether a chat turn is in flight.
    pub waiting: bool,
    /// Whether flow generation is in flight.
    pub generating: bool,
    /// The drafting thread, persisted across runs.
    pub thread_id: ThreadId,
    /// The last created flow, if any.
    pub flow_id: Option<FlowId>,
    /// Hosted preview URL from the last generation.
    pub preview_url: Option<String>,
    /// The editor graph shown in the center pane.
    pub graph: GraphDocument,
    /// Which way the auto-layout stacks ranks.
    pub direction: Direction,
    /// Selected node index in the graph pane.
    pub selected_node: usize,
    /// Interactive preview, present once a flow document is loaded.
    pub preview: Option<PreviewPane>,
    /// Transient note for the status line.
    pub status_message: Option<String>,
    /// Ticks since launch.
    pub tick: usize,
    /// Last observed server health.
    pub server_health: ServerHealth,

    client: WhatsflowClient,
    store: PlaygroundStore,
    health: Arc<Mutex<ServerHealth>>,
    health_task: tokio::task::JoinHandle<()>,
    app_tx: mpsc::UnboundedSender<AppEvent>,
    app_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Open the playground store, restore the previous session's thread,
    /// flow id, and graph, and load the flow document if one was given.
    /// Must run inside a tokio runtime; the health probe spawns here.
    pub fn new(config: TuiConfig) -> Result<Self> {
        let client = WhatsflowClient::new(&config.server_url)?;

        let store_path = config
            .store_path
            .unwrap_or_else(whatsflow_config::default_store_path);
        let store = PlaygroundStore::open(&store_path)
            .with_context(|| format!("opening playground store at {}", store_path.display()))?;

        let thread_id = match store.thread_id()? {
            Some(id) => id,
            None => {
                let id = ThreadId::new();
                store.set_thread_id(&id)?;
                id
            }
        };
        let flow_id = store.flow_id()?;

        // A flow file replaces the stored arrangement; otherwise the saved
        // graph comes back exactly as left.
        let (graph, preview) = match &config.flow_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading flow document {}", path.display()))?;
                let doc = FlowDocument::from_json(&json)
                    .with_context(|| format!("parsing flow document {}", path.display()))?;
                let mut graph = derive_graph(&doc);
                layout(&mut graph, Direction::default());
                store.set_graph(&graph)?;
                (graph, Some(PreviewPane::new(doc)?))
            }
            None => (store.graph()?.unwrap_or_default(), None),
        };

        let health = Arc::new(Mutex::new(ServerHealth::Unknown));
        let health_task = spawn_health_poll(client.clone(), Arc::clone(&health));
        let (app_tx, app_rx) = mpsc::unbounded_channel();

        Ok(Self {
            server_url: config.server_url,
            focus: Focus::default(),
            should_quit: false,
            input: InputState::new(),
            transcript: Vec::new(),
            chat_scroll: 0,
            chat_auto_scroll: true,
            waiting: false,
            generating: false,
            thread_id,
            flow_id,
            preview_url: None,
            graph,
            direction: Direction::default(),
            selected_node: 0,
            preview,
            status_message: None,
            tick: 0,
            server_health: ServerHealth::Unknown,
            client,
            store,
            health,
            health_task,
            app_tx,
            app_rx,
        })
    }

    /// Draw and react until the user quits.
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut pump = EventPump::spawn();

        while !self.should_quit {
            terminal.draw(|frame| ui::render(self, frame))?;

            tokio::select! {
                event = pump.next() => {
                    match event? {
                        Event::Key(key) => self.handle_key(key),
                        Event::Tick => {
                            self.tick = self.tick.wrapping_add(1);
                            self.server_health = *self.health.lock();
                        }
                        Event::Resize(_, _) => {
                            // Re-rendered on the next iteration.
                        }
                    }
                }

                app_event = self.app_rx.recv() => {
                    if let Some(event) = app_event {
                        self.handle_app_event(event);
                    }
                }
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard input
    // ─────────────────────────────────────────────────────────────────────────

    /// Route one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Control chords work the same in every pane.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('g') => {
                    self.generate_flow();
                    return;
                }
                KeyCode::Char('r') => {
                    self.reset_preview();
                    return;
                }
                KeyCode::Char('l') => {
                    self.toggle_layout();
                    return;
                }
                // Unbound control chords do nothing rather than typing.
                KeyCode::Char(_) => return,
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            // q quits everywhere except the chat input, where it is a letter.
            KeyCode::Char('q') if self.focus != Focus::Chat => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Chat => self.handle_chat_key(key),
            Focus::Graph => self.handle_graph_key(key),
            Focus::Preview => self.handle_preview_key(key),
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.input.insert_char(c);
            }
            KeyCode::Backspace => {
                self.input.delete_char_before();
            }
            KeyCode::Delete => {
                self.input.delete_char_at();
            }
            KeyCode::Left => {
                self.input.move_left();
            }
            KeyCode::Right => {
                self.input.move_right();
            }
            KeyCode::Home => {
                if self.input.is_empty() {
                    self.chat_auto_scroll = false;
                    self.chat_scroll = 0;
                } else {
                    self.input.move_to_start();
                }
            }
            KeyCode::End => {
                if self.input.is_empty() {
                    self.chat_auto_scroll = true;
                } else {
                    self.input.move_to_end();
                }
            }
            KeyCode::Enter => {
                if !self.waiting && !self.input.is_empty() {
                    self.send_message();
                }
            }
            KeyCode::Esc => {
                if !self.input.is_empty() {
                    self.input.clear();
                } else {
                    self.status_message = None;
                }
            }
            KeyCode::Up => {
                if self.input.is_empty() {
                    self.scroll_chat_up(1);
                } else {
                    self.input.history_prev();
                }
            }
            KeyCode::Down => {
                if self.input.is_empty() {
                    self.scroll_chat_down(1);
                } else {
                    self.input.history_next();
                }
            }
            KeyCode::PageUp => {
                self.scroll_chat_up(10);
            }
            KeyCode::PageDown => {
                self.scroll_chat_down(10);
            }
            _ => {}
        }
    }

    fn handle_graph_key(&mut self, key: KeyEvent) {
        if self.graph.nodes.is_empty() {
            return;
        }
        match key.code {
            KeyCode::Up | KeyCode::Left => {
                self.selected_node = self
                    .selected_node
                    .checked_sub(1)
                    .unwrap_or(self.graph.nodes.len() - 1);
            }
            KeyCode::Down | KeyCode::Right => {
                self.selected_node = (self.selected_node + 1) % self.graph.nodes.len();
            }
            KeyCode::Enter => {
                self.preview_selected_node();
            }
            KeyCode::Esc => {
                self.status_message = None;
            }
            _ => {}
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        let Some(pane) = self.preview.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up => pane.select_prev(),
            KeyCode::Down => pane.select_next(),
            KeyCode::Enter => match pane.activate() {
                Ok(note) => {
                    if note.is_some() {
                        self.status_message = note;
                    }
                }
                Err(error) => self.status_message = Some(error.to_string()),
            },
            KeyCode::Backspace => match pane.back() {
                Ok(note) => {
                    if note.is_some() {
                        self.status_message = note;
                    }
                }
                Err(error) => self.status_message = Some(error.to_string()),
            },
            KeyCode::Esc => {
                self.status_message = None;
            }
            _ => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Server calls
    // ─────────────────────────────────────────────────────────────────────────

    /// Send the chat input to the planner on a spawned task.
    fn send_message(&mut self) {
        let text = self.input.submit().trim().to_string();
        if text.is_empty() {
            return;
        }
        self.transcript.push(ChatMessage::user(text.clone()));
        self.chat_auto_scroll = true;
        self.waiting = true;
        self.status_message = None;

        let client = self.client.clone();
        let thread_id = self.thread_id.clone();
        let tx = self.app_tx.clone();
        tokio::spawn(async move {
            let event = match client.chat(&thread_id, &text).await {
                Ok(reply) => AppEvent::ChatReply(reply),
                Err(error) => AppEvent::Error(format!("Chat failed: {}", error)),
            };
            let _ = tx.send(event);
        });
    }

    /// Ask the server to generate a flow from the current thread.
    fn generate_flow(&mut self) {
        if self.generating {
            self.status_message = Some("Flow generation already running".to_string());
            return;
        }
        self.generating = true;
        self.status_message = None;

        let client = self.client.clone();
        let thread_id = self.thread_id.clone();
        let tx = self.app_tx.clone();
        tokio::spawn(async move {
            let event = match client.generate_flow(&thread_id).await {
                Ok(generation) => AppEvent::FlowReady(Box::new(generation)),
                Err(error) => AppEvent::Error(format!("Flow generation failed: {}", error)),
            };
            let _ = tx.send(event);
        });
    }

    /// Handle a result from a spawned server call.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatReply(reply) => {
                self.waiting = false;
                self.transcript
                    .push(ChatMessage::assistant(assistant_text(&reply)));
            }
            AppEvent::FlowReady(generation) => {
                self.apply_generation(*generation);
            }
            AppEvent::Error(message) => {
                self.waiting = false;
                self.generating = false;
                tracing::warn!(error = %message, "server call failed");
                self.status_message = Some(message);
            }
        }
    }

    /// Fold a finished generation into the panes and the store.
    fn apply_generation(&mut self, generation: FlowGeneration) {
        self.generating = false;
        self.flow_id = Some(generation.flow_id.clone());
        self.preview_url = generation.preview_url.clone();

        if let Err(error) = self.store.set_flow_id(&generation.flow_id) {
            tracing::warn!(error = %error, "failed to persist flow id");
        }

        match GraphDocument::from_value(generation.react_json) {
            Ok(mut graph) if !graph.nodes.is_empty() => {
                layout(&mut graph, self.direction);
                self.graph = graph;
                self.selected_node = 0;
                self.persist_graph();
            }
            Ok(_) => {
                tracing::debug!("generation reply carried no editor nodes");
            }
            Err(error) => {
                tracing::warn!(error = %error, "editor graph in the generation reply did not parse");
            }
        }

        self.status_message = Some(match &self.preview_url {
            Some(url) => format!("Flow {} created, preview at {}", generation.flow_id, url),
            None => format!("Flow {} created (no preview URL)", generation.flow_id),
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pane actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Jump the preview to the screen behind the selected graph node.
    fn preview_selected_node(&mut self) {
        let Some(node) = self.graph.nodes.get(self.selected_node) else {
            return;
        };
        let screen = ScreenId::from(node.id.as_str());
        let Some(pane) = self.preview.as_mut() else {
            self.status_message = Some("No flow document loaded for preview".to_string());
            return;
        };
        match pane.jump_to_screen(&screen) {
            Ok(()) => {
                self.focus = Focus::Preview;
                self.status_message = Some(format!("Previewing {}", screen));
            }
            Err(error) => {
                self.status_message = Some(error.to_string());
            }
        }
    }

    fn reset_preview(&mut self) {
        if let Some(pane) = self.preview.as_mut() {
            pane.reset();
            self.status_message = Some("Preview reset".to_string());
        }
    }

    /// Flip the layout direction and re-run layout on the current graph.
    fn toggle_layout(&mut self) {
        self.direction = self.direction.toggled();
        if !self.graph.nodes.is_empty() {
            layout(&mut self.graph, self.direction);
            self.persist_graph();
        }
        self.status_message = Some(format!("Layout direction {}", self.direction.as_str()));
    }

    fn persist_graph(&self) {
        if let Err(error) = self.store.set_graph(&self.graph) {
            tracing::warn!(error = %error, "failed to persist graph");
        }
    }

    /// Scroll chat up, detaching from the live bottom.
    fn scroll_chat_up(&mut self, lines: usize) {
        self.chat_auto_scroll = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    /// Scroll chat down. The offset is clamped at render time.
    fn scroll_chat_down(&mut self, lines: usize) {
        self.chat_scroll += lines;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.health_task.abort();
    }
}

/// Probe the server's health endpoint in the background.
fn spawn_health_poll(
    client: WhatsflowClient,
    health: Arc<Mutex<ServerHealth>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEALTH_POLL_INTERVAL);
        loop {
            interval.tick().await;
            let status = if client.is_healthy().await {
                ServerHealth::Reachable
            } else {
                ServerHealth::Unreachable
            };
            *health.lock() = status;
        }
    })
}

/// Pull a displayable reply out of the planner's free-form JSON.
///
/// The planner's reply shape is not pinned down; well-known message fields
/// win, anything else shows as compact JSON.
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
