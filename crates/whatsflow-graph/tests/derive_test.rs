//! Graph derivation and layout against the bundled insurance demo flow.

use whatsflow_flow::FlowDocument;
use whatsflow_graph::{Direction, GraphDocument, derive_graph, layout};

const INSURANCE_FLOW: &str = include_str!("../../../demos/insurance.json");

fn demo_graph() -> GraphDocument {
    let doc = FlowDocument::from_json(INSURANCE_FLOW).expect("demo flow parses");
    derive_graph(&doc)
}

#[test]
fn test_demo_flow_derives_one_node_per_screen() {
    let graph = demo_graph();
    let ids: Vec<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(
        ids,
        ["FIRST_SCREEN", "QUOTE_SCREEN", "COVERAGE_SCREEN", "CONTACT_SCREEN"]
    );
    assert_eq!(graph.nodes[0].label, "Our offers");
}

#[test]
fn test_demo_flow_edges_deduplicate_and_keep_labels() {
    let graph = demo_graph();
    let mut ids: Vec<&str> = graph.edges.iter().map(|edge| edge.id.as_str()).collect();
    ids.sort();
    assert_eq!(
        ids,
        [
            "edge_COVERAGE_SCREEN_CONTACT_SCREEN",
            "edge_FIRST_SCREEN_CONTACT_SCREEN",
            "edge_FIRST_SCREEN_QUOTE_SCREEN",
            "edge_QUOTE_SCREEN_COVERAGE_SCREEN",
        ]
    );

    // The first navigation to each target names the edge.
    let quote = graph
        .edges
        .iter()
        .find(|edge| edge.id == "edge_FIRST_SCREEN_QUOTE_SCREEN")
        .unwrap();
    assert_eq!(quote.label.as_deref(), Some("Home Insurance"));
    let footer = graph
        .edges
        .iter()
        .find(|edge| edge.id == "edge_QUOTE_SCREEN_COVERAGE_SCREEN")
        .unwrap();
    assert_eq!(footer.label.as_deref(), Some("Continue"));
}

#[test]
fn test_layout_then_round_trip_preserves_positions() {
    let mut graph = demo_graph();
    layout(&mut graph, Direction::TopBottom);

    // Screens form a chain plus a skip edge; ranks must ascend.
    let first = graph.node("FIRST_SCREEN").unwrap().position;
    let quote = graph.node("QUOTE_SCREEN").unwrap().position;
    let coverage = graph.node("COVERAGE_SCREEN").unwrap().position;
    let contact = graph.node("CONTACT_SCREEN").unwrap().position;
    assert!(first.y < quote.y);
    assert!(quote.y < coverage.y);
    assert!(coverage.y < contact.y);

    let json = graph.to_json().unwrap();
    let reloaded = GraphDocument::from_json(&json).unwrap();
    assert_eq!(reloaded, graph);
}
