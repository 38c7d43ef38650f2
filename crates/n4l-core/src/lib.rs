//! N4L Core Library
//!
//! Turns short documents into small typed knowledge graphs and retrieves
//! query-relevant context from them:
//! - Phrase canonicalization (display labels for events, things, concepts)
//! - Pattern-based relation extraction
//! - Intent scoring of words and phrases
//! - Graph model and the document-to-graph pipeline
//! - Graph storage (SQLite)
//! - Similarity + intent retrieval and context rendering

pub mod canonical;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod infrastructure;
pub mod intent;
pub mod pipeline;
pub mod retrieval;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::graph::{
        Edge, EdgeType, Graph, GraphRepository, InsertOutcome, Node, NodeType,
    };
    pub use crate::error::{Error, Result};
    pub use crate::extract::{Relation, RelationExtractor, extract_relations};
    pub use crate::infrastructure::graph::SqliteGraphStore;
    pub use crate::intent::{IntentParams, compute_token_intent, phrase_intent};
    pub use crate::pipeline::{Pipeline, doc_to_graph};
    pub use crate::retrieval::{Retrieval, RetrievalConfig, Retriever};
}
