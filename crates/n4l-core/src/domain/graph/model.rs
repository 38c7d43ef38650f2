//! In-memory N4L graph
//!
//! Nodes are keyed by label and edges by (source, type, target). Both keep
//! insertion order so persisted rows and rendered output are deterministic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::edge::{Edge, EdgeType};
use super::node::{Node, NodeType};

/// A small directed multigraph of typed, scored nodes and typed edges
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_keys: HashSet<(String, EdgeType, String)>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; a label that is already present keeps its first type and intent
    ///
    /// A non-finite intent is stored as 0. Returns `true` if the node was inserted.
    pub fn add_node(&mut self, label: impl Into<String>, node_type: NodeType, intent: f64) -> bool {
        let label = label.into();
        if self.node_index.contains_key(&label) {
            return false;
        }

        let intent = if intent.is_finite() { intent } else { 0.0 };
        self.node_index.insert(label.clone(), self.nodes.len());
        self.nodes.push(Node::new(label, node_type, intent));
        true
    }

    /// Add an edge; an identical (source, type, target) edge is a no-op
    ///
    /// Endpoints are not required to exist as nodes.
    /// Returns `true` if the edge was inserted.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        edge_type: EdgeType,
        target: impl Into<String>,
    ) -> bool {
        let source = source.into();
        let target = target.into();
        let key = (source.clone(), edge_type, target.clone());
        if !self.edge_keys.insert(key) {
            return false;
        }

        self.edges.push(Edge::new(source, edge_type, target));
        true
    }

    /// Look up a node by label
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.node_index.get(label).map(|&i| &self.nodes[i])
    }

    /// Whether a node with this label exists
    pub fn contains_node(&self, label: &str) -> bool {
        self.node_index.contains_key(label)
    }

    /// Whether this exact edge exists
    pub fn contains_edge(&self, source: &str, edge_type: EdgeType, target: &str) -> bool {
        self.edge_keys
            .contains(&(source.to_string(), edge_type, target.to_string()))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Export flattened node and edge rows
    pub fn to_records(&self) -> GraphRecords {
        GraphRecords {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuild a graph from flattened rows, applying the usual deduplication
    pub fn from_records(records: GraphRecords) -> Self {
        let mut graph = Self::new();
        for node in records.nodes {
            graph.add_node(node.label, node.node_type, node.intent);
        }
        for edge in records.edges {
            graph.add_edge(edge.source, edge.edge_type, edge.target);
        }
        graph
    }
}

/// Flattened graph rows, ready for persistence or export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecords {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_first_write_wins() {
        let mut graph = Graph::new();
        assert!(graph.add_node("Code Reviews", NodeType::Thing, 0.4));
        assert!(!graph.add_node("Code Reviews", NodeType::Event, 0.9));

        let node = graph.node("Code Reviews").unwrap();
        assert_eq!(node.node_type, NodeType::Thing);
        assert_eq!(node.intent, 0.4);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_non_finite_intent_is_zeroed() {
        let mut graph = Graph::new();
        graph.add_node("Nan", NodeType::Thing, f64::NAN);
        graph.add_node("Inf", NodeType::Event, f64::INFINITY);
        graph.add_node("Neg", NodeType::Concept, f64::NEG_INFINITY);
        graph.add_node("Finite", NodeType::Thing, 0.75);

        assert_eq!(graph.node("Nan").unwrap().intent, 0.0);
        assert_eq!(graph.node("Inf").unwrap().intent, 0.0);
        assert_eq!(graph.node("Neg").unwrap().intent, 0.0);
        assert_eq!(graph.node("Finite").unwrap().intent, 0.75);
    }

    #[test]
    fn test_add_edge_deduplicates_exact_triples() {
        let mut graph = Graph::new();
        assert!(graph.add_edge("A", EdgeType::LeadsTo, "B"));
        assert!(!graph.add_edge("A", EdgeType::LeadsTo, "B"));

        assert_eq!(graph.to_records().edges.len(), 1);
    }

    #[test]
    fn test_parallel_edges_with_different_types() {
        let mut graph = Graph::new();
        graph.add_edge("A", EdgeType::LeadsTo, "B");
        graph.add_edge("A", EdgeType::Expresses, "B");
        graph.add_edge("B", EdgeType::LeadsTo, "A");

        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains_edge("A", EdgeType::Expresses, "B"));
        assert!(!graph.contains_edge("A", EdgeType::Near, "B"));
    }

    #[test]
    fn test_records_preserve_insertion_order() {
        let mut graph = Graph::new();
        graph.add_node("Zeta", NodeType::Thing, 0.1);
        graph.add_node("Alpha", NodeType::Event, 0.2);
        graph.add_edge("Zeta", EdgeType::LeadsTo, "Alpha");

        let records = graph.to_records();
        let labels: Vec<&str> = records.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);
        assert_eq!(records.edges[0], Edge::new("Zeta", EdgeType::LeadsTo, "Alpha"));
    }

    #[test]
    fn test_from_records_roundtrip() {
        let mut graph = Graph::new();
        graph.add_node("Narrow Spread Narrowing", NodeType::Event, 0.0);
        graph.add_node("Liquidity Confidence", NodeType::Concept, 0.0);
        graph.add_edge(
            "Narrow Spread Narrowing",
            EdgeType::Expresses,
            "Liquidity Confidence",
        );

        let rebuilt = Graph::from_records(graph.to_records());
        assert_eq!(rebuilt.to_records(), graph.to_records());
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert!(graph.node("missing").is_none());
        assert!(!graph.contains_node("missing"));
    }
}
