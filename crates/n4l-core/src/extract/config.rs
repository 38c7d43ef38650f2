//! Extraction vocabulary
//!
//! The verb sets and connective words that drive the surface patterns. They
//! are plain data so several extractor configurations can coexist.

use serde::{Deserialize, Serialize};

use crate::canonical::VerbFamily;

/// Word lists used to build the relation matchers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Intensity verbs for `<subject> <verb> <object>` triplets
    pub action_verbs: Vec<String>,
    /// Verbs for `X causes Y` clauses; multi-word entries match any whitespace
    pub causal_verbs: Vec<String>,
    /// Extra verbs accepted only after a `which`/`that` lead-in
    pub lead_in_verbs: Vec<String>,
    /// Verbs for `X provides Z which Y` clauses
    pub provide_verbs: Vec<String>,
    /// Verbs for `X expresses Y` clauses
    pub express_verbs: Vec<String>,
    /// Relative pronouns that open a lead-in clause
    pub relatives: Vec<String>,
    /// Leading connective words stripped from every captured clause
    pub connectives: Vec<String>,
    /// Prepositions that split a concept into head and qualifier, in priority order
    pub qualifier_prepositions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            action_verbs: VerbFamily::all()
                .iter()
                .flat_map(|family| family.verbs().iter().map(|v| v.to_string()))
                .collect(),
            causal_verbs: words(&[
                "causes",
                "cause",
                "leads to",
                "results in",
                "drives",
                "triggers",
                "induces",
                "enables",
                "enable",
                "creates",
                "create",
            ]),
            lead_in_verbs: words(&["simplifies", "improves", "protects"]),
            provide_verbs: words(&["provides", "provide", "offers", "offer", "delivers", "deliver"]),
            express_verbs: words(&[
                "expresses",
                "expressed",
                "express",
                "reflects",
                "signals",
                "indicates",
                "represents",
                "shows",
                "show",
                "demonstrates",
                "demonstrate",
            ]),
            relatives: words(&["which", "that"]),
            connectives: words(&[
                "which",
                "that",
                "to",
                "and",
                "so",
                "then",
                "thus",
                "therefore",
            ]),
            qualifier_prepositions: words(&["in", "of"]),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Build a regex alternation from a word list
///
/// Each entry is escaped and its internal spaces match any whitespace run.
pub(crate) fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}
