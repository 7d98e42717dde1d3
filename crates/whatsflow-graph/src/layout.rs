//! Layered auto-layout.
//!
//! Nodes are ranked by longest path from the roots, ordered within each rank
//! by the mean position of their parents, and placed on a fixed grid sized
//! for the editor's node box. Cycles are legal in flow graphs (back
//! navigation), so ranking ignores edges that would point back up the order;
//! every node still lands on a rank.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::document::{GraphDocument, Position};

/// The editor's node box.
pub const NODE_WIDTH: f64 = 172.0;
pub const NODE_HEIGHT: f64 = 36.0;

const NODE_GAP: f64 = 50.0;
const RANK_GAP: f64 = 50.0;

/// Which way ranks stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    TopBottom,
    LeftRight,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::TopBottom => Direction::LeftRight,
            Direction::LeftRight => Direction::TopBottom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
        }
    }
}

/// Lay out every node in place. Positions are the node box's top-left
/// corner, ranks centered against the widest rank.
pub fn layout(graph: &mut GraphDocument, direction: Direction) {
    if graph.nodes.is_empty() {
        return;
    }

    let index_of: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect();

    // Unlabelled adjacency, one entry per distinct pair, self-loops dropped.
    let count = graph.nodes.len();
    let mut outgoing = vec![Vec::new(); count];
    let mut incoming = vec![Vec::new(); count];
    let mut seen = HashSet::new();
    for edge in &graph.edges {
        let (Some(&source), Some(&target)) = (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if source == target || !seen.insert((source, target)) {
            continue;
        }
        outgoing[source].push(target);
        incoming[target].push(source);
    }

    let ranks = assign_ranks(count, &outgoing);
    let rows = order_rows(&ranks, &incoming);
    place(graph, &rows, direction);
}

// ─────────────────────────────────────────────────────────────────────────────
// Ranking
// ─────────────────────────────────────────────────────────────────────────────

/// Longest-path ranks over the graph with back-edges removed.
fn assign_ranks(count: usize, outgoing: &[Vec<usize>]) -> Vec<usize> {
    let back = back_edges(count, outgoing);

    let mut in_degree = vec![0usize; count];
    for (node, children) in outgoing.iter().enumerate() {
        for &child in children {
            if !back.contains(&(node, child)) {
                in_degree[child] += 1;
            }
        }
    }

    let mut ranks = vec![0usize; count];
    let mut queue: VecDeque<usize> = (0..count).filter(|&node| in_degree[node] == 0).collect();
    while let Some(node) = queue.pop_front() {
        for &child in &outgoing[node] {
            if back.contains(&(node, child)) {
                continue;
            }
            ranks[child] = ranks[child].max(ranks[node] + 1);
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }
    ranks
}

/// Edges closing a cycle, found by depth-first search in node order.
fn back_edges(count: usize, outgoing: &[Vec<usize>]) -> HashSet<(usize, usize)> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut marks = vec![Mark::New; count];
    let mut back = HashSet::new();
    for start in 0..count {
        if marks[start] != Mark::New {
            continue;
        }
        marks[start] = Mark::Active;
        let mut stack = vec![(start, 0usize)];
        while let Some(&mut (node, ref mut cursor)) = stack.last_mut() {
            if let Some(&child) = outgoing[node].get(*cursor) {
                *cursor += 1;
                match marks[child] {
                    Mark::New => {
                        marks[child] = Mark::Active;
                        stack.push((child, 0));
                    }
                    Mark::Active => {
                        back.insert((node, child));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }
    back
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering and placement
// ─────────────────────────────────────────────────────────────────────────────

/// Group nodes by rank, then run one barycenter sweep: each rank is sorted
/// by the mean position of its parents in the rank above.
fn order_rows(ranks: &[usize], incoming: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut rows = vec![Vec::new(); max_rank + 1];
    for (node, &rank) in ranks.iter().enumerate() {
        rows[rank].push(node);
    }

    for rank in 1..rows.len() {
        let above: HashMap<usize, usize> = rows[rank - 1]
            .iter()
            .enumerate()
            .map(|(slot, &node)| (node, slot))
            .collect();
        let mut keyed: Vec<(f64, usize)> = rows[rank]
            .iter()
            .enumerate()
            .map(|(slot, &node)| {
                let parents: Vec<usize> = incoming[node]
                    .iter()
                    .filter_map(|parent| above.get(parent).copied())
                    .collect();
                let key = if parents.is_empty() {
                    slot as f64
                } else {
                    parents.iter().sum::<usize>() as f64 / parents.len() as f64
                };
                (key, node)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        rows[rank] = keyed.into_iter().map(|(_, node)| node).collect();
    }
    rows
}

fn place(graph: &mut GraphDocument, rows: &[Vec<usize>], direction: Direction) {
    // Node extent along a row and from rank to rank depends on orientation.
    let (row_step, rank_step) = match direction {
        Direction::TopBottom => (NODE_WIDTH + NODE_GAP, NODE_HEIGHT + RANK_GAP),
        Direction::LeftRight => (NODE_HEIGHT + NODE_GAP, NODE_WIDTH + RANK_GAP),
    };

    let extent = |len: usize| {
        if len == 0 {
            0.0
        } else {
            (len - 1) as f64 * row_step
        }
    };
    let widest = rows
        .iter()
        .map(|row| extent(row.len()))
        .fold(0.0, f64::max);

    for (rank, row) in rows.iter().enumerate() {
        let offset = (widest - extent(row.len())) / 2.0;
        for (slot, &node) in row.iter().enumerate() {
            let along = offset + slot as f64 * row_step;
            let across = rank as f64 * rank_step;
            graph.nodes[node].position = match direction {
                Direction::TopBottom => Position::new(along, across),
                Direction::LeftRight => Position::new(across, along),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{GraphEdge, GraphNode};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> GraphDocument {
        GraphDocument {
            nodes: nodes
                .iter()
                .map(|id| GraphNode {
                    id: id.to_string(),
                    label: id.to_string(),
                    position: Position::default(),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(source, target)| GraphEdge {
                    id: GraphEdge::edge_id(source, target),
                    source: source.to_string(),
                    target: target.to_string(),
                    label: None,
                })
                .collect(),
        }
    }

    fn position(graph: &GraphDocument, id: &str) -> Position {
        graph.node(id).unwrap().position
    }

    #[test]
    fn test_chain_stacks_top_to_bottom() {
        let mut graph = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        layout(&mut graph, Direction::TopBottom);
        assert_eq!(position(&graph, "A"), Position::new(0.0, 0.0));
        assert_eq!(position(&graph, "B"), Position::new(0.0, 86.0));
        assert_eq!(position(&graph, "C"), Position::new(0.0, 172.0));
    }

    #[test]
    fn test_chain_runs_left_to_right() {
        let mut graph = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        layout(&mut graph, Direction::LeftRight);
        assert_eq!(position(&graph, "A"), Position::new(0.0, 0.0));
        assert_eq!(position(&graph, "B"), Position::new(222.0, 0.0));
        assert_eq!(position(&graph, "C"), Position::new(444.0, 0.0));
    }

    #[test]
    fn test_diamond_centers_narrow_ranks() {
        let mut graph = graph(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        layout(&mut graph, Direction::TopBottom);
        // The middle rank is the widest; single-node ranks center on it.
        assert_eq!(position(&graph, "A"), Position::new(111.0, 0.0));
        assert_eq!(position(&graph, "B"), Position::new(0.0, 86.0));
        assert_eq!(position(&graph, "C"), Position::new(222.0, 86.0));
        assert_eq!(position(&graph, "D"), Position::new(111.0, 172.0));
    }

    #[test]
    fn test_cycle_still_ranks_every_node() {
        let mut graph = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        layout(&mut graph, Direction::TopBottom);
        assert_eq!(position(&graph, "A"), Position::new(0.0, 0.0));
        assert_eq!(position(&graph, "B"), Position::new(0.0, 86.0));
    }

    #[test]
    fn test_barycenter_follows_parents() {
        // X's parent sits after Y's parent in the first rank, so X lands
        // after Y regardless of insertion order.
        let mut graph = graph(&["A", "B", "X", "Y"], &[("B", "X"), ("A", "Y")]);
        layout(&mut graph, Direction::TopBottom);
        let x = position(&graph, "X");
        let y = position(&graph, "Y");
        assert!(y.x < x.x, "Y at {:?} should sit left of X at {:?}", y, x);
        assert_eq!(x.y, y.y);
    }

    #[test]
    fn test_empty_graph_is_untouched() {
        let mut graph = GraphDocument::new();
        layout(&mut graph, Direction::TopBottom);
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(Direction::TopBottom.toggled(), Direction::LeftRight);
        assert_eq!(Direction::LeftRight.toggled().as_str(), "TB");
    }
}
