//! N4L graph domain module
//!
//! The data model shared by extraction, persistence and retrieval:
//!
//! - **Node**: a canonical label with a kind (event, thing, concept) and an
//!   intent score. Labels are unique within a graph; the first write wins.
//! - **Edge**: a typed, directed link (NEAR, LEADS-TO, CONTAINS, EXPRESSES).
//!   Exact (source, type, target) duplicates are dropped.
//! - **Graph**: an owned collection of both, identified at the storage layer
//!   by a caller-chosen graph identifier.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use n4l_core::domain::graph::{EdgeType, Graph, NodeType};
//!
//! let mut graph = Graph::new();
//! graph.add_node("Code Reviews", NodeType::Thing, 0.12);
//! graph.add_node("Bugs Reduction", NodeType::Event, 0.08);
//! graph.add_edge("Code Reviews", EdgeType::LeadsTo, "Bugs Reduction");
//!
//! repository.insert_graph(&graph, "software", true).await?;
//! ```

mod edge;
mod model;
mod node;
mod repository;

pub use edge::{Edge, EdgeType};
pub use model::{Graph, GraphRecords};
pub use node::{Node, NodeType};
pub use repository::{GraphRepository, GraphStats, InsertOutcome};
