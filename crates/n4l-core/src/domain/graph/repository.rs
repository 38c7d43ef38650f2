//! Repository trait for graph persistence
//!
//! Graphs are stored as flattened node and edge rows keyed by a
//! caller-chosen graph identifier. The whole graph is the unit of update.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

use super::edge::Edge;
use super::model::{Graph, GraphRecords};
use super::node::Node;

/// Repository trait for N4L graph persistence
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// Persist a graph under `graph_id`
    ///
    /// When rows already exist for the identifier they are replaced wholesale
    /// if `replace_existing` is set, and left untouched otherwise.
    async fn insert_graph(
        &self,
        graph: &Graph,
        graph_id: &str,
        replace_existing: bool,
    ) -> Result<InsertOutcome>;

    /// All node rows stored for a graph, in insertion order
    async fn query_nodes(&self, graph_id: &str) -> Result<Vec<Node>>;

    /// All edge rows stored for a graph, in insertion order
    async fn query_edges(&self, graph_id: &str) -> Result<Vec<Edge>>;

    /// Distinct graph identifiers, ascending
    async fn list_graphs(&self) -> Result<Vec<String>>;

    /// Whether at least one node row exists for the identifier
    async fn graph_exists(&self, graph_id: &str) -> Result<bool>;

    /// Remove every row for a graph; returns `true` if anything was deleted
    async fn delete_graph(&self, graph_id: &str) -> Result<bool>;

    /// Row counts for a graph
    async fn graph_stats(&self, graph_id: &str) -> Result<GraphStats>;

    /// Rebuild the in-memory graph stored under `graph_id`
    async fn load_graph(&self, graph_id: &str) -> Result<Graph> {
        let nodes = self.query_nodes(graph_id).await?;
        let edges = self.query_edges(graph_id).await?;
        Ok(Graph::from_records(GraphRecords { nodes, edges }))
    }
}

/// What `insert_graph` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InsertOutcome {
    /// No previous rows existed; the graph was written
    Inserted { nodes: usize, edges: usize },
    /// Previous rows were deleted and the graph was written
    Replaced {
        previous_nodes: u64,
        nodes: usize,
        edges: usize,
    },
    /// Previous rows were kept and nothing was written
    Skipped { existing_nodes: u64 },
}

impl InsertOutcome {
    /// Whether rows were written
    pub fn wrote_rows(&self) -> bool {
        !matches!(self, Self::Skipped { .. })
    }
}

/// Row counts for one stored graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub edge_count: u64,
}
