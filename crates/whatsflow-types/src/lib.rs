//! Identifier and transcript types shared across the WhatsFlow crates.

pub mod ids;
pub mod message;

pub use ids::{FlowId, ScreenId, ThreadId};
pub use message::{ChatMessage, ChatRole};

use chrono::{DateTime, Utc};

/// Timestamp type used across the system.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
pub fn now() -> Timestamp {
    Utc::now()
}
