//! HTTP clients for the WhatsFlow toolkit.
//!
//! Three surfaces live here:
//!
//! - [`PlannerClient`] — the external AI backend that drafts flows from a
//!   conversation (`/chat`, `/plan`, `/get_flows`).
//! - [`GraphApiClient`] — the Meta Graph API calls that create, preview, and
//!   publish WhatsApp flows.
//! - [`WhatsflowClient`] — a typed SDK for the WhatsFlow server itself, used
//!   by the CLI and the playground.
//!
//! The planner and publisher are abstracted behind the [`Planner`] and
//! [`FlowPublisher`] traits so the server can run against [`MockPlanner`] and
//! [`MockPublisher`] in tests.
//!
//! # Example
//!
//! ```no_run
//! use whatsflow_client::{WhatsflowClient, Result};
//! use whatsflow_types::ThreadId;
//!
//! # async fn example() -> Result<()> {
//! let client = WhatsflowClient::new("http://localhost:8686")?;
//!
//! let thread = ThreadId::new();
//! let reply = client.chat(&thread, "A flow for booking appointments").await?;
//! println!("{}", reply);
//!
//! let generation = client.generate_flow(&thread).await?;
//! println!("flow {} at {:?}", generation.flow_id, generation.preview_url);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph_api;
pub mod mock;
pub mod planner;
pub mod service;
pub mod types;

pub use error::{ClientError, Result};
pub use graph_api::{FlowPublisher, GraphApiClient, GraphApiConfig};
pub use mock::{MockPlanner, MockPublisher, PlannerCall};
pub use planner::{MAKE_FLOW_QUERY, Planner, PlannerClient, PlannerConfig};
pub use service::WhatsflowClient;
pub use types::*;
