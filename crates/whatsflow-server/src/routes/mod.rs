//! Request handlers, one module per surface.

pub mod chat;
pub mod flow;
pub mod health;

pub use chat::{ChatRequest, chat_handler};
pub use flow::{FlowRequest, flow_handler, publish_handler};
pub use health::{HealthReport, health_handler};
