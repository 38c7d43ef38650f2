//! Graph nodes
//!
//! A node is identified by its canonical label within one graph and carries
//! a kind and an intent score.

use serde::{Deserialize, Serialize};

/// A labeled, typed, intent-scored node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Canonical label, unique within a graph
    pub label: String,
    /// Kind of node
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Intentionality score; practically in [0, ~1] but not bounded
    pub intent: f64,
}

impl Node {
    /// Create a new node
    pub fn new(label: impl Into<String>, node_type: NodeType, intent: f64) -> Self {
        Self {
            label: label.into(),
            node_type,
            intent,
        }
    }
}

/// Kinds of N4L nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Something that happens (e.g., "Bug Reduction")
    Event,
    /// A participant or actor (e.g., "Code Reviews")
    Thing,
    /// An abstract idea expressed by an event (e.g., "Liquidity Confidence")
    Concept,
}

impl NodeType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Thing => "thing",
            Self::Concept => "concept",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "event" => Some(Self::Event),
            "thing" => Some(Self::Thing),
            "concept" => Some(Self::Concept),
            _ => None,
        }
    }

    /// Get all node types
    pub fn all() -> &'static [NodeType] {
        &[Self::Event, Self::Thing, Self::Concept]
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parsing() {
        assert_eq!(NodeType::parse("event"), Some(NodeType::Event));
        assert_eq!(NodeType::parse("THING"), Some(NodeType::Thing));
        assert_eq!(NodeType::parse("concept"), Some(NodeType::Concept));
        assert_eq!(NodeType::parse("entity"), None);
    }

    #[test]
    fn test_node_type_str_roundtrip() {
        for t in NodeType::all() {
            assert_eq!(NodeType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn test_node_serializes_type_field() {
        let node = Node::new("Code Reviews", NodeType::Thing, 0.25);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "thing");
        assert_eq!(json["label"], "Code Reviews");
    }
}
