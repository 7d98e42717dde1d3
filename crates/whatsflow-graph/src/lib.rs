//! Editor graph model and auto-layout.
//!
//! The playground's middle pane is a node graph of the flow's screens. This
//! crate owns that document: deriving it from a flow, laying it out in
//! ranked layers, and serializing it with positions intact so a saved
//! arrangement reloads exactly as left.

pub mod document;
pub mod error;
pub mod layout;

pub use document::{GraphDocument, GraphEdge, GraphNode, Position, derive_graph};
pub use error::{GraphError, Result};
pub use layout::{Direction, NODE_HEIGHT, NODE_WIDTH, layout};
