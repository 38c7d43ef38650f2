//! Relation extraction
//!
//! Splits a document into sentences and runs an ordered list of
//! [`RelationMatcher`] strategies over each one. Results follow sentence
//! order, then matcher order, with duplicate (source, relation, target)
//! triples dropped after their first occurrence.
//!
//! Extraction never fails: text that matches nothing yields no relations.

mod clause;
mod config;
mod matcher;

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use tracing::debug;

use crate::domain::graph::{EdgeType, NodeType};
use crate::error::Result;

pub use clause::{ClauseCleaner, QualifierSplitter, mentions_narrowing, split_sentences};
pub use config::ExtractorConfig;
pub use matcher::{
    ActionTripletMatcher, CausalMatcher, ExpressiveMatcher, GENERIC_CAUSE, MatcherFamily,
    RelationMatcher,
};

static DEFAULT_EXTRACTOR: LazyLock<RelationExtractor> = LazyLock::new(RelationExtractor::default);

/// One typed relation between two labelled phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub source: String,
    pub relation: EdgeType,
    pub target: String,
    pub source_kind: NodeType,
    pub target_kind: NodeType,
}

impl Relation {
    pub fn new(
        source: impl Into<String>,
        relation: EdgeType,
        target: impl Into<String>,
        source_kind: NodeType,
        target_kind: NodeType,
    ) -> Self {
        Self {
            source: source.into(),
            relation,
            target: target.into(),
            source_kind,
            target_kind,
        }
    }
}

/// Runs matchers over sentences and deduplicates the results
pub struct RelationExtractor {
    matchers: Vec<Box<dyn RelationMatcher>>,
}

impl RelationExtractor {
    /// Build the standard matcher families from a vocabulary
    ///
    /// A family whose verb list is empty is left out.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let cleaner = Arc::new(ClauseCleaner::new(&config.connectives)?);
        let mut matchers: Vec<Box<dyn RelationMatcher>> = Vec::new();

        if !config.action_verbs.is_empty() {
            matchers.push(Box::new(ActionTripletMatcher::new(
                &config.action_verbs,
                Arc::clone(&cleaner),
            )?));
        }
        if !config.causal_verbs.is_empty() || !config.provide_verbs.is_empty() {
            matchers.push(Box::new(CausalMatcher::new(
                &config.causal_verbs,
                &config.lead_in_verbs,
                &config.provide_verbs,
                &config.relatives,
                Arc::clone(&cleaner),
            )?));
        }
        if !config.express_verbs.is_empty() {
            matchers.push(Box::new(ExpressiveMatcher::new(
                &config.express_verbs,
                &config.qualifier_prepositions,
                cleaner,
            )?));
        }

        Ok(Self { matchers })
    }

    /// Use a custom matcher list, applied in the given order
    pub fn with_matchers(matchers: Vec<Box<dyn RelationMatcher>>) -> Self {
        Self { matchers }
    }

    /// Matcher families in application order
    pub fn families(&self) -> Vec<MatcherFamily> {
        self.matchers.iter().map(|m| m.family()).collect()
    }

    /// Extract deduplicated relations from a document
    pub fn extract(&self, text: &str) -> Vec<Relation> {
        let mut seen: HashSet<(String, EdgeType, String)> = HashSet::new();
        let mut relations = Vec::new();

        for sentence in split_sentences(text) {
            for matcher in &self.matchers {
                for relation in matcher.match_sentence(sentence) {
                    if relation.source.is_empty() || relation.target.is_empty() {
                        continue;
                    }
                    let key = (
                        relation.source.clone(),
                        relation.relation,
                        relation.target.clone(),
                    );
                    if seen.insert(key) {
                        relations.push(relation);
                    }
                }
            }
        }

        debug!(relations = relations.len(), "Extracted relations");
        relations
    }
}

impl Default for RelationExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default()).expect("default extraction patterns are valid")
    }
}

/// Extract relations with the default vocabulary
pub fn extract_relations(text: &str) -> Vec<Relation> {
    DEFAULT_EXTRACTOR.extract(text)
}
