//! Event plumbing for the playground.
//!
//! Terminal input is pumped off crossterm's async stream on its own task and
//! merged with a steady tick. Spawned server calls report back separately on
//! a channel owned by the app.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;
use whatsflow_client::FlowGeneration;

/// How often the loop wakes without input. Drives the spinner and the
/// health indicator refresh.
const TICK_RATE: Duration = Duration::from_millis(250);

/// What the terminal produced.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// New terminal dimensions.
    Resize(u16, u16),
    /// Periodic wakeup between inputs.
    Tick,
}

/// Results of server calls running on spawned tasks.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The planner's chat reply, verbatim.
    ChatReply(Value),
    /// Flow generation finished.
    FlowReady(Box<FlowGeneration>),
    /// A server call failed.
    Error(String),
}

/// Reads the terminal on a background task and hands out merged events.
pub struct EventPump {
    rx: mpsc::UnboundedReceiver<Event>,
    reader: tokio::task::JoinHandle<()>,
}

impl EventPump {
    /// Start the reader task. Needs a running tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(pump(tx));
        Self { rx, reader }
    }

    /// The next terminal event or tick.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("terminal event stream ended"))
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Forward terminal events and ticks until the terminal or the receiver
/// goes away.
async fn pump(tx: mpsc::UnboundedSender<Event>) {
    let mut stream = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => Some(Event::Tick),
            terminal = stream.next() => match terminal {
                Some(Ok(event)) => translate(event),
                Some(Err(error)) => {
                    tracing::warn!(error = %error, "terminal read failed");
                    return;
                }
                None => return,
            },
        };
        if let Some(event) = event
            && tx.send(event).is_err()
        {
            return;
        }
    }
}

/// Map a crossterm event to ours. Key releases and repeats are dropped;
/// only presses act.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}
