//! Document to graph pipeline
//!
//! Scores the document's words once, extracts relations once, then adds
//! both endpoints and the edge of every relation to a fresh [`Graph`].

use std::sync::LazyLock;

use tracing::debug;

use crate::domain::graph::Graph;
use crate::error::Result;
use crate::extract::{ExtractorConfig, RelationExtractor};
use crate::intent::{IntentParams, compute_token_intent};

static DEFAULT_PIPELINE: LazyLock<Pipeline> = LazyLock::new(Pipeline::default);

/// Builds graphs from documents
#[derive(Default)]
pub struct Pipeline {
    extractor: RelationExtractor,
    params: IntentParams,
}

impl Pipeline {
    pub fn new(extractor: RelationExtractor, params: IntentParams) -> Self {
        Self { extractor, params }
    }

    /// Build a pipeline from an extraction vocabulary and intent parameters
    pub fn from_config(config: &ExtractorConfig, params: IntentParams) -> Result<Self> {
        Ok(Self::new(RelationExtractor::new(config)?, params))
    }

    pub fn params(&self) -> IntentParams {
        self.params
    }

    /// Build the graph for one document; never fails
    pub fn build(&self, text: &str) -> Graph {
        let scores = compute_token_intent(text, self.params);
        let relations = self.extractor.extract(text);

        let mut graph = Graph::new();
        for relation in &relations {
            let source_intent = scores.phrase_intent(&relation.source);
            let target_intent = scores.phrase_intent(&relation.target);

            graph.add_node(relation.source.as_str(), relation.source_kind, source_intent);
            graph.add_node(relation.target.as_str(), relation.target_kind, target_intent);
            graph.add_edge(
                relation.source.as_str(),
                relation.relation,
                relation.target.as_str(),
            );
        }

        debug!(
            tokens = scores.len(),
            relations = relations.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built graph"
        );
        graph
    }
}

/// Build a graph with the default vocabulary and intent parameters
pub fn doc_to_graph(text: &str) -> Graph {
    DEFAULT_PIPELINE.build(text)
}
