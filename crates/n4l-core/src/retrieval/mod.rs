//! Query-time retrieval
//!
//! Ranks a stored graph's nodes against a query, keeps the edges around the
//! best matches, and renders them as prompt-ready context.
//!
//! A node's score is `similarity(query, label) + intent_weight × intent`.
//! The top `top_k` nodes become seeds; every edge touching a seed is kept.
//! An unknown graph identifier is not an error: it yields no nodes, no edges
//! and the "no relationships" context.

mod render;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::graph::{Edge, EdgeType, GraphRepository, NodeType};
use crate::error::{Error, Result};

pub use render::{
    CONTEXT_FOOTER, CONTEXT_HEADER, MAX_LABEL_CHARS, NO_RELATIONSHIPS_CONTEXT, RELATIONSHIPS_INTRO,
    is_displayable, render_context, render_line, similarity,
};

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of seed nodes
    pub top_k: usize,
    /// Weight of node intent relative to lexical similarity
    pub intent_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            intent_weight: 0.6,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidInput("top_k must be at least 1".to_string()));
        }
        if !self.intent_weight.is_finite() || self.intent_weight < 0.0 {
            return Err(Error::InvalidInput(
                "intent_weight must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// A seed node with its retrieval score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub intent: f64,
    pub score: f64,
}

/// Result of one retrieval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retrieval {
    /// Rendered context text
    pub context: String,
    /// Seed nodes, best first
    pub nodes: Vec<RankedNode>,
    /// Deduplicated edges touching a seed, before display filtering
    pub edges: Vec<Edge>,
    /// Number of relationship lines in `context`
    pub relationship_count: usize,
}

/// Retrieves query-relevant subgraphs from a graph repository
pub struct Retriever<R: GraphRepository + ?Sized> {
    repository: Arc<R>,
    config: RetrievalConfig,
}

impl<R: GraphRepository + ?Sized> Retriever<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, RetrievalConfig::default())
    }

    pub fn with_config(repository: Arc<R>, config: RetrievalConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Retrieve with the configured `top_k` and `intent_weight`
    pub async fn retrieve(&self, query: &str, graph_id: &str) -> Result<Retrieval> {
        self.retrieve_with(query, graph_id, self.config).await
    }

    /// Retrieve with explicit ranking parameters
    pub async fn retrieve_with(
        &self,
        query: &str,
        graph_id: &str,
        config: RetrievalConfig,
    ) -> Result<Retrieval> {
        let nodes = self.repository.query_nodes(graph_id).await?;
        let edges = self.repository.query_edges(graph_id).await?;

        let mut ranked: Vec<RankedNode> = nodes
            .into_iter()
            .map(|node| {
                let score = similarity(query, &node.label) + config.intent_weight * node.intent;
                RankedNode {
                    label: node.label,
                    node_type: node.node_type,
                    intent: node.intent,
                    score,
                }
            })
            .collect();
        // Stable, so equal scores keep storage order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(config.top_k);

        let seeds: HashSet<&str> = ranked.iter().map(|n| n.label.as_str()).collect();
        let mut seen: HashSet<(&str, EdgeType, &str)> = HashSet::new();
        let mut kept = Vec::new();
        for edge in &edges {
            let touches_seed =
                seeds.contains(edge.source.as_str()) || seeds.contains(edge.target.as_str());
            if touches_seed && seen.insert(edge.key()) {
                kept.push(edge.clone());
            }
        }

        let (context, relationship_count) = render_context(&kept);
        debug!(
            graph_id = %graph_id,
            seeds = ranked.len(),
            edges = kept.len(),
            relationships = relationship_count,
            "Retrieved context"
        );

        Ok(Retrieval {
            context,
            nodes: ranked,
            edges: kept,
            relationship_count,
        })
    }

    /// Retrieve from several graphs and join the contexts that found something
    ///
    /// Each contributing block reads `From <graph_id>:` followed by that
    /// graph's context. When no graph contributes, the "no relationships"
    /// context is returned.
    pub async fn retrieve_many(&self, query: &str, graph_ids: &[String]) -> Result<String> {
        let mut blocks = Vec::with_capacity(graph_ids.len());
        for graph_id in graph_ids {
            let retrieval = self.retrieve(query, graph_id).await?;
            if retrieval.relationship_count > 0 {
                blocks.push(format!("From {graph_id}:\n{}", retrieval.context));
            }
        }

        if blocks.is_empty() {
            return Ok(NO_RELATIONSHIPS_CONTEXT.to_string());
        }
        Ok(blocks.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::Graph;
    use crate::infrastructure::graph::SqliteGraphStore;

    async fn store_with(graph: &Graph, graph_id: &str) -> Arc<SqliteGraphStore> {
        let store = SqliteGraphStore::in_memory().await.unwrap();
        store.insert_graph(graph, graph_id, true).await.unwrap();
        Arc::new(store)
    }

    fn market_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node("Market Makers", NodeType::Thing, 0.0);
        graph.add_node("Spread Narrowing", NodeType::Event, 0.0);
        graph.add_node("Liquidity Confidence", NodeType::Concept, 0.0);
        graph.add_node("Toxic Takers", NodeType::Thing, 0.0);
        graph.add_node("Activity Reduction", NodeType::Event, 0.0);
        graph.add_edge("Market Makers", EdgeType::LeadsTo, "Spread Narrowing");
        graph.add_edge("Spread Narrowing", EdgeType::Expresses, "Liquidity Confidence");
        graph.add_edge("Toxic Takers", EdgeType::LeadsTo, "Activity Reduction");
        graph
    }

    #[tokio::test]
    async fn test_unknown_graph() {
        let retriever = Retriever::new(store_with(&market_graph(), "market").await);
        let result = retriever.retrieve("spreads", "nonexistent-graph-id").await.unwrap();

        assert_eq!(result.context, NO_RELATIONSHIPS_CONTEXT);
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
        assert_eq!(result.relationship_count, 0);
    }

    #[tokio::test]
    async fn test_seed_edges_only() {
        let retriever = Retriever::with_config(
            store_with(&market_graph(), "market").await,
            RetrievalConfig {
                top_k: 1,
                intent_weight: 0.6,
            },
        );
        let result = retriever.retrieve("market makers", "market").await.unwrap();

        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].label, "Market Makers");
        assert_eq!(result.nodes[0].score, 1.0);
        assert_eq!(
            result.edges,
            vec![Edge::new("Market Makers", EdgeType::LeadsTo, "Spread Narrowing")]
        );
        assert!(result
            .context
            .contains("- Market Makers leads to Spread Narrowing."));
        assert_eq!(result.relationship_count, 1);
    }

    #[tokio::test]
    async fn test_intent_weight_shifts_ranking() {
        let mut graph = Graph::new();
        graph.add_node("Spread", NodeType::Thing, 0.0);
        graph.add_node("Volume", NodeType::Thing, 2.0);
        let store = store_with(&graph, "g").await;

        let retriever = Retriever::new(Arc::clone(&store));
        let lexical = RetrievalConfig {
            top_k: 1,
            intent_weight: 0.0,
        };
        let weighted = RetrievalConfig {
            top_k: 1,
            intent_weight: 1.0,
        };

        let by_text = retriever.retrieve_with("spread", "g", lexical).await.unwrap();
        assert_eq!(by_text.nodes[0].label, "Spread");

        let by_intent = retriever.retrieve_with("spread", "g", weighted).await.unwrap();
        assert_eq!(by_intent.nodes[0].label, "Volume");
    }

    #[tokio::test]
    async fn test_ties_keep_storage_order() {
        let mut graph = Graph::new();
        graph.add_node("Bbb", NodeType::Thing, 0.0);
        graph.add_node("Aaa", NodeType::Thing, 0.0);
        graph.add_node("Ccc", NodeType::Thing, 0.0);
        let retriever = Retriever::new(store_with(&graph, "g").await);

        let result = retriever.retrieve("zzz", "g").await.unwrap();
        let labels: Vec<_> = result.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Bbb", "Aaa", "Ccc"]);
    }

    #[tokio::test]
    async fn test_filtered_edges_are_still_returned() {
        let mut graph = Graph::new();
        graph.add_node("Causing Flow Which Grows", NodeType::Event, 0.0);
        graph.add_node("Effecting Spreads", NodeType::Event, 0.0);
        graph.add_edge(
            "Causing Flow Which Grows",
            EdgeType::LeadsTo,
            "Effecting Spreads",
        );
        let retriever = Retriever::new(store_with(&graph, "g").await);

        let result = retriever.retrieve("flow", "g").await.unwrap();
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.relationship_count, 0);
        assert_eq!(result.context, NO_RELATIONSHIPS_CONTEXT);
    }

    #[tokio::test]
    async fn test_duplicate_edge_rows_are_collapsed() {
        let mut graph = Graph::new();
        graph.add_node("A", NodeType::Thing, 0.0);
        graph.add_node("B", NodeType::Event, 0.0);
        graph.add_edge("A", EdgeType::LeadsTo, "B");

        let store = store_with(&graph, "x").await;
        sqlx::query("INSERT INTO edges (graph_id, src, dst, edge_type) VALUES ('x', 'A', 'B', 'LEADS-TO')")
            .execute(store.database().pool())
            .await
            .unwrap();
        assert_eq!(store.query_edges("x").await.unwrap().len(), 2);

        let result = Retriever::new(store).retrieve("a", "x").await.unwrap();
        assert_eq!(result.edges, vec![Edge::new("A", EdgeType::LeadsTo, "B")]);
        assert_eq!(result.relationship_count, 1);
        assert_eq!(result.context.matches("- A leads to B.").count(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_many() {
        let store = store_with(&market_graph(), "market").await;
        let retriever = Retriever::new(store);

        let joined = retriever
            .retrieve_many(
                "toxic takers",
                &["missing".to_string(), "market".to_string()],
            )
            .await
            .unwrap();

        assert!(joined.starts_with("From market:\n### Retrieved Knowledge Context"));
        assert!(!joined.contains("From missing:"));
    }

    #[tokio::test]
    async fn test_retrieve_many_without_matches() {
        let retriever = Retriever::new(store_with(&market_graph(), "market").await);

        let joined = retriever
            .retrieve_many("anything", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(joined, NO_RELATIONSHIPS_CONTEXT);
    }

    #[test]
    fn test_config_validation() {
        assert!(RetrievalConfig::default().validate().is_ok());
        assert!(RetrievalConfig {
            top_k: 0,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(RetrievalConfig {
            intent_weight: -1.0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }
}
