//! Graph edges
//!
//! Edges are directed and typed. Several edges may connect the same ordered
//! pair of labels as long as their types differ.

use serde::{Deserialize, Serialize};

/// A typed, directed edge between two node labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node label
    #[serde(rename = "src")]
    pub source: String,
    /// Relationship type
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Target node label
    #[serde(rename = "dst")]
    pub target: String,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: impl Into<String>, edge_type: EdgeType, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edge_type,
            target: target.into(),
        }
    }

    /// Deduplication key: (source, type, target)
    pub fn key(&self) -> (&str, EdgeType, &str) {
        (&self.source, self.edge_type, &self.target)
    }
}

/// N4L relationship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Source is loosely related to target
    #[serde(rename = "NEAR")]
    Near,
    /// Source leads to target (causal or sequential)
    #[serde(rename = "LEADS-TO")]
    LeadsTo,
    /// Source contains target
    #[serde(rename = "CONTAINS")]
    Contains,
    /// Source expresses target
    #[serde(rename = "EXPRESSES")]
    Expresses,
}

impl EdgeType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Near => "NEAR",
            Self::LeadsTo => "LEADS-TO",
            Self::Contains => "CONTAINS",
            Self::Expresses => "EXPRESSES",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('_', "-").as_str() {
            "NEAR" => Some(Self::Near),
            "LEADS-TO" | "LEADSTO" => Some(Self::LeadsTo),
            "CONTAINS" => Some(Self::Contains),
            "EXPRESSES" => Some(Self::Expresses),
            _ => None,
        }
    }

    /// Verb phrase used when rendering the edge as a sentence
    pub fn verb_phrase(&self) -> &'static str {
        match self {
            Self::Near => "is related to",
            Self::LeadsTo => "leads to",
            Self::Contains => "contains",
            Self::Expresses => "expresses",
        }
    }

    /// Get all edge types
    pub fn all() -> &'static [EdgeType] {
        &[Self::Near, Self::LeadsTo, Self::Contains, Self::Expresses]
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_parsing() {
        assert_eq!(EdgeType::parse("LEADS-TO"), Some(EdgeType::LeadsTo));
        assert_eq!(EdgeType::parse("leads_to"), Some(EdgeType::LeadsTo));
        assert_eq!(EdgeType::parse("expresses"), Some(EdgeType::Expresses));
        assert_eq!(EdgeType::parse("NEAR"), Some(EdgeType::Near));
        assert_eq!(EdgeType::parse("causes"), None);
    }

    #[test]
    fn test_edge_type_str_roundtrip() {
        for t in EdgeType::all() {
            assert_eq!(EdgeType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn test_verb_phrases() {
        assert_eq!(EdgeType::LeadsTo.verb_phrase(), "leads to");
        assert_eq!(EdgeType::Near.verb_phrase(), "is related to");
    }

    #[test]
    fn test_edge_serialization_uses_wire_names() {
        let edge = Edge::new("A", EdgeType::LeadsTo, "B");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["src"], "A");
        assert_eq!(json["dst"], "B");
        assert_eq!(json["type"], "LEADS-TO");
    }
}
