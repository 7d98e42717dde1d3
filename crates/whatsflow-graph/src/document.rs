//! The editor graph document.
//!
//! The visual editor shows one draggable node per flow screen, connected by
//! the flow's navigation. The graph persists separately from the flow
//! document so hand-placed node positions survive reloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use whatsflow_flow::{Component, FlowDocument, Screen};

use crate::error::Result;
use crate::error::GraphError;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// A point in editor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A random spot near the origin, where hand-added nodes land before
    /// the user drags them or runs auto-layout.
    pub fn random() -> Self {
        Self {
            x: rand::random::<f64>() * 100.0,
            y: rand::random::<f64>() * 100.0,
        }
    }
}

/// A draggable box in the visual editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub position: Position,
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    /// The id scheme for an edge between two nodes. One id per source and
    /// target pair, so reconnecting the same nodes never duplicates edges.
    pub fn edge_id(source: &str, target: &str) -> String {
        format!("edge_{}_{}", source, target)
    }
}

/// The persisted editor state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

impl GraphDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        let id = GraphEdge::edge_id(source, target);
        self.edges.iter().any(|edge| edge.id == id)
    }

    /// Add a free-standing node at a random position, as the editor's
    /// "New Node" button does.
    pub fn add_node(&mut self) -> &GraphNode {
        let id = self.fresh_node_id();
        let label = format!("Node {}", self.nodes.len() + 1);
        self.nodes.push(GraphNode {
            id,
            label,
            position: Position::random(),
        });
        &self.nodes[self.nodes.len() - 1]
    }

    /// Connect two existing nodes. Reconnecting an already-connected pair
    /// returns the existing edge.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<&GraphEdge> {
        if self.node(source).is_none() {
            return Err(GraphError::UnknownNode(source.to_string()));
        }
        if self.node(target).is_none() {
            return Err(GraphError::UnknownNode(target.to_string()));
        }
        let id = GraphEdge::edge_id(source, target);
        if let Some(index) = self.edges.iter().position(|edge| edge.id == id) {
            return Ok(&self.edges[index]);
        }
        let label = format!("Connection {}", self.edges.len() + 1);
        self.edges.push(GraphEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            label: Some(label),
        });
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.retain(|node| node.id != id);
        self.edges.retain(|edge| edge.source != id && edge.target != id);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Scatter every node still sitting at the origin.
    pub fn scatter_positions(&mut self) {
        for node in &mut self.nodes {
            if node.position == Position::default() {
                node.position = Position::random();
            }
        }
    }

    fn fresh_node_id(&self) -> String {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let id = format!("node_{}", millis);
            if self.node(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derivation from flow documents
// ─────────────────────────────────────────────────────────────────────────────

/// Build the editor graph for a flow document: one node per screen, one edge
/// per navigation, labelled with where the navigation comes from.
///
/// Duplicate source and target pairs collapse into one edge, component
/// navigations winning over bare `routing_model` entries. Positions start at
/// the origin; run layout or scatter afterwards.
pub fn derive_graph(doc: &FlowDocument) -> GraphDocument {
    let mut graph = GraphDocument::new();
    for screen in &doc.screens {
        graph.nodes.push(GraphNode {
            id: screen.id.to_string(),
            label: screen.title.clone(),
            position: Position::default(),
        });
    }
    for screen in &doc.screens {
        for (label, target) in screen_navigations(screen) {
            push_edge(&mut graph, screen.id.as_str(), &target, label);
        }
    }
    for (source, targets) in doc.routing_entries() {
        for target in targets {
            push_edge(&mut graph, source.as_str(), target.as_str(), None);
        }
    }
    graph
}

/// Navigations declared on a screen, paired with the label of the component
/// they come from.
fn screen_navigations(screen: &Screen) -> Vec<(Option<String>, String)> {
    let mut navigations = Vec::new();
    screen.visit_components(&mut |component| {
        match component {
            Component::NavigationList { list_items, .. } => {
                for item in list_items {
                    if let Some(target) = item
                        .on_click_action
                        .as_ref()
                        .and_then(|action| action.navigate_target())
                    {
                        navigations
                            .push((Some(item.main_content.title.clone()), target.to_string()));
                    }
                }
            }
            Component::Footer {
                label,
                on_click_action,
            } => {
                if let Some(target) =
                    on_click_action.as_ref().and_then(|action| action.navigate_target())
                {
                    navigations.push((Some(label.clone()), target.to_string()));
                }
            }
            Component::EmbeddedLink {
                text,
                on_click_action,
                ..
            } => {
                if let Some(target) =
                    on_click_action.as_ref().and_then(|action| action.navigate_target())
                {
                    navigations.push((Some(text.clone()), target.to_string()));
                }
            }
            other => {
                for action in other.actions() {
                    if let Some(target) = action.navigate_target() {
                        let label = other.name().map(str::to_string);
                        navigations.push((label, target.to_string()));
                    }
                }
            }
        }
    });
    navigations
}

fn push_edge(graph: &mut GraphDocument, source: &str, target: &str, label: Option<String>) {
    if graph.node(target).is_none() {
        debug!(source, target, "navigation targets a screen with no node");
        return;
    }
    if graph.contains_edge(source, target) {
        return;
    }
    graph.edges.push(GraphEdge {
        id: GraphEdge::edge_id(source, target),
        source: source.to_string(),
        target: target.to_string(),
        label,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> FlowDocument {
        FlowDocument::from_json(
            r#"{
            "version": "7.0",
            "routing_model": { "START": ["END"] },
            "screens": [
                { "id": "START", "title": "Start",
                  "layout": { "type": "SingleColumnLayout", "children": [
                      { "type": "NavigationList", "name": "menu", "list-items": [
                          { "id": "go", "main-content": { "title": "Go to the end" },
                            "on-click-action": { "name": "navigate",
                              "next": { "type": "screen", "name": "END" }, "payload": {} } }
                      ] }
                  ] } },
                { "id": "END", "title": "End", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [
                      { "type": "Footer", "label": "Done",
                        "on-click-action": { "name": "complete", "payload": {} } }
                  ] } }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_derive_nodes_and_labelled_edges() {
        let graph = derive_graph(&flow());
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].id, "START");
        assert_eq!(graph.nodes[0].label, "Start");

        // The navigation edge and the routing_model entry collapse into one.
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, "edge_START_END");
        assert_eq!(graph.edges[0].label.as_deref(), Some("Go to the end"));
    }

    #[test]
    fn test_derive_skips_dangling_targets() {
        let doc = FlowDocument::from_json(
            r#"{
            "version": "7.0",
            "routing_model": { "A": ["MISSING"] },
            "screens": [
                { "id": "A", "title": "A", "terminal": true,
                  "layout": { "type": "SingleColumnLayout", "children": [] } }
            ]
        }"#,
        )
        .unwrap();
        let graph = derive_graph(&doc);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_add_node_and_connect() {
        let mut graph = GraphDocument::new();
        let first = graph.add_node().id.clone();
        let second = graph.add_node().id.clone();
        assert_ne!(first, second);
        assert_eq!(graph.nodes[1].label, "Node 2");

        let edge = graph.connect(&first, &second).unwrap();
        assert_eq!(edge.label.as_deref(), Some("Connection 1"));

        // Reconnecting the same pair returns the existing edge.
        graph.connect(&first, &second).unwrap();
        assert_eq!(graph.edges.len(), 1);

        assert!(matches!(
            graph.connect(&first, "ghost"),
            Err(GraphError::UnknownNode(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_remove_node_drops_its_edges() {
        let mut graph = derive_graph(&flow());
        graph.remove_node("END");
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_positions_exactly() {
        let mut graph = derive_graph(&flow());
        graph.nodes[0].position = Position::new(13.370000000000001, -0.25);
        graph.nodes[1].position = Position::new(86.0, 172.99999999999997);

        let json = graph.to_json().unwrap();
        let reloaded = GraphDocument::from_json(&json).unwrap();
        assert_eq!(reloaded, graph);
    }

    #[test]
    fn test_scatter_moves_only_origin_nodes() {
        let mut graph = derive_graph(&flow());
        graph.nodes[0].position = Position::new(500.0, 500.0);
        graph.scatter_positions();
        assert_eq!(graph.nodes[0].position, Position::new(500.0, 500.0));
        let scattered = graph.nodes[1].position;
        assert!(scattered.x >= 0.0 && scattered.x < 100.0);
        assert!(scattered.y >= 0.0 && scattered.y < 100.0);
    }
}
