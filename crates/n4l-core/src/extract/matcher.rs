//! Relation matchers
//!
//! Each matcher recognizes one family of surface patterns in a single
//! sentence. Matches with an empty required clause are dropped.

use std::sync::Arc;

use regex::Regex;

use crate::canonical::{
    normalize_space, phrase_from_head_and_modifier, phrase_from_verb_object, thing_phrase,
    titleize,
};
use crate::domain::graph::{EdgeType, NodeType};
use crate::error::Result;

use super::Relation;
use super::clause::{ClauseCleaner, QualifierSplitter, mentions_narrowing};
use super::config::alternation;

/// Label used when a causal clause has no explicit source
pub const GENERIC_CAUSE: &str = "Cause";

/// Families of surface patterns, in extraction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherFamily {
    /// `<subject> <intensity verb> <object>`
    ActionTriplet,
    /// `X causes Y`, `which causes Y`, `X provides Z which Y`
    Causal,
    /// `X expresses Y`
    Expressive,
}

impl MatcherFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActionTriplet => "action_triplet",
            Self::Causal => "causal",
            Self::Expressive => "expressive",
        }
    }
}

/// A strategy that turns one sentence into zero or more relations
pub trait RelationMatcher: Send + Sync {
    /// Which pattern family this matcher implements
    fn family(&self) -> MatcherFamily;

    /// All relations found in the sentence, in match order
    fn match_sentence(&self, sentence: &str) -> Vec<Relation>;
}

/// Matches `<subject> <verb> <object>` with a closed set of intensity verbs
///
/// Emits `thing --LEADS-TO--> event`, where the event is synthesized from the
/// verb and object (e.g. "reduce bugs" -> "Bugs Reduction").
pub struct ActionTripletMatcher {
    pattern: Regex,
    cleaner: Arc<ClauseCleaner>,
}

impl ActionTripletMatcher {
    pub fn new(verbs: &[String], cleaner: Arc<ClauseCleaner>) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)(?P<subj>[\w\s\-/]+?)\s+(?P<verb>{})\s+(?P<obj>[\w\s\-/]+)",
            alternation(verbs)
        ))?;
        Ok(Self { pattern, cleaner })
    }
}

impl RelationMatcher for ActionTripletMatcher {
    fn family(&self) -> MatcherFamily {
        MatcherFamily::ActionTriplet
    }

    fn match_sentence(&self, sentence: &str) -> Vec<Relation> {
        self.pattern
            .captures_iter(sentence)
            .filter_map(|caps| {
                let subject = self.cleaner.clean(caps.name("subj")?.as_str());
                let verb = caps.name("verb")?.as_str().to_lowercase();
                let object = self.cleaner.clean(caps.name("obj")?.as_str());
                if subject.is_empty() || object.is_empty() {
                    return None;
                }

                let event = phrase_from_verb_object(&verb, Some(&object));
                Some(Relation::new(
                    thing_phrase(&subject),
                    EdgeType::LeadsTo,
                    normalize_space(&event),
                    NodeType::Thing,
                    NodeType::Event,
                ))
            })
            .collect()
    }
}

/// Matches causal clauses and emits `event --LEADS-TO--> event`
///
/// Three alternatives are tried in order:
/// - `X causes Y`
/// - `which causes Y` (no explicit source; the source becomes "Cause")
/// - `X provides Z which Y` (Z is the effect)
pub struct CausalMatcher {
    patterns: Vec<Regex>,
    cleaner: Arc<ClauseCleaner>,
}

impl CausalMatcher {
    pub fn new(
        causal_verbs: &[String],
        lead_in_verbs: &[String],
        provide_verbs: &[String],
        relatives: &[String],
        cleaner: Arc<ClauseCleaner>,
    ) -> Result<Self> {
        let causal = alternation(causal_verbs);
        let lead_in = alternation(&[causal_verbs, lead_in_verbs].concat());
        let provide = alternation(provide_verbs);
        let relative = alternation(relatives);

        let mut sources = Vec::new();
        if !causal.is_empty() {
            sources.push(format!(
                r"(?i)(?P<src>[^.;:]+?)\s+(?:{causal})\s+(?P<dst>[^.;:]+)"
            ));
        }
        if !lead_in.is_empty() && !relative.is_empty() {
            sources.push(format!(
                r"(?i)(?:{relative})\s+(?:{lead_in})\s+(?P<dst2>[^.;:]+)"
            ));
        }
        if !provide.is_empty() && !relative.is_empty() {
            sources.push(format!(
                r"(?i)(?P<src>[^.;:]+?)\s+(?:{provide})\s+(?P<dst>[^.;:]+?)\s+(?:{relative})\s+(?P<dst2>[^.;:]+)"
            ));
        }

        let patterns = sources
            .iter()
            .map(|s| Regex::new(s))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns, cleaner })
    }
}

impl RelationMatcher for CausalMatcher {
    fn family(&self) -> MatcherFamily {
        MatcherFamily::Causal
    }

    fn match_sentence(&self, sentence: &str) -> Vec<Relation> {
        let mut relations = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(sentence) {
                let effect = caps
                    .name("dst")
                    .map(|m| self.cleaner.clean(m.as_str()))
                    .filter(|d| !d.is_empty())
                    .or_else(|| caps.name("dst2").map(|m| self.cleaner.clean(m.as_str())))
                    .unwrap_or_default();
                if effect.is_empty() {
                    continue;
                }

                let source = caps
                    .name("src")
                    .map(|m| self.cleaner.clean(m.as_str()))
                    .unwrap_or_default();

                let effect_event = if mentions_narrowing(&effect) {
                    phrase_from_verb_object("narrow", Some(&effect))
                } else {
                    phrase_from_verb_object("effect", Some(&effect))
                };
                let cause_event = if source.is_empty() {
                    GENERIC_CAUSE.to_string()
                } else {
                    phrase_from_verb_object("cause", Some(&source))
                };

                relations.push(Relation::new(
                    normalize_space(&cause_event),
                    EdgeType::LeadsTo,
                    normalize_space(&effect_event),
                    NodeType::Event,
                    NodeType::Event,
                ));
            }
        }

        relations
    }
}

/// Matches `X expresses Y` and emits `event --EXPRESSES--> concept`
///
/// The concept is built qualifier-first from a prepositional split of Y:
/// "confidence in liquidity" -> "Liquidity Confidence".
pub struct ExpressiveMatcher {
    pattern: Regex,
    cleaner: Arc<ClauseCleaner>,
    splitter: QualifierSplitter,
}

impl ExpressiveMatcher {
    pub fn new(
        express_verbs: &[String],
        qualifier_prepositions: &[String],
        cleaner: Arc<ClauseCleaner>,
    ) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)(?P<src>[^.;:]+?)\s+(?:{})\s+(?P<dst>[^.;:]+)",
            alternation(express_verbs)
        ))?;
        let splitter = QualifierSplitter::new(qualifier_prepositions)?;
        Ok(Self {
            pattern,
            cleaner,
            splitter,
        })
    }
}

impl RelationMatcher for ExpressiveMatcher {
    fn family(&self) -> MatcherFamily {
        MatcherFamily::Expressive
    }

    fn match_sentence(&self, sentence: &str) -> Vec<Relation> {
        self.pattern
            .captures_iter(sentence)
            .filter_map(|caps| {
                let source = self.cleaner.clean(caps.name("src")?.as_str());
                let target = self.cleaner.clean(caps.name("dst")?.as_str());
                if source.is_empty() || target.is_empty() {
                    return None;
                }

                let source_event = if mentions_narrowing(&source) {
                    phrase_from_verb_object("narrow", Some(&source))
                } else {
                    titleize(&source)
                };
                let (head, qualifier) = self.splitter.split(&target);
                let concept = phrase_from_head_and_modifier(head, qualifier);

                Some(Relation::new(
                    normalize_space(&source_event),
                    EdgeType::Expresses,
                    normalize_space(&concept),
                    NodeType::Event,
                    NodeType::Concept,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractorConfig;

    fn cleaner() -> Arc<ClauseCleaner> {
        Arc::new(ClauseCleaner::new(&ExtractorConfig::default().connectives).unwrap())
    }

    fn action() -> ActionTripletMatcher {
        ActionTripletMatcher::new(&ExtractorConfig::default().action_verbs, cleaner()).unwrap()
    }

    fn causal() -> CausalMatcher {
        let c = ExtractorConfig::default();
        CausalMatcher::new(
            &c.causal_verbs,
            &c.lead_in_verbs,
            &c.provide_verbs,
            &c.relatives,
            cleaner(),
        )
        .unwrap()
    }

    fn expressive() -> ExpressiveMatcher {
        let c = ExtractorConfig::default();
        ExpressiveMatcher::new(&c.express_verbs, &c.qualifier_prepositions, cleaner()).unwrap()
    }

    #[test]
    fn test_action_triplet() {
        let rels = action().match_sentence("Toxic takers reduce activity");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source, "Toxic Takers");
        assert_eq!(rels[0].target, "Activity Reduction");
        assert_eq!(rels[0].relation, EdgeType::LeadsTo);
        assert_eq!(rels[0].source_kind, NodeType::Thing);
        assert_eq!(rels[0].target_kind, NodeType::Event);
    }

    #[test]
    fn test_action_triplet_requires_whole_verb() {
        assert!(action().match_sentence("Proper caching reduces database hits").is_empty());
        assert!(action().match_sentence("Reduce").is_empty());
    }

    #[test]
    fn test_action_triplet_narrowing_singularizes() {
        let rels = action().match_sentence("Market makers narrow spreads");
        assert_eq!(rels[0].source, "Market Makers");
        assert_eq!(rels[0].target, "Spread Narrowing");
    }

    #[test]
    fn test_causal_with_source() {
        let rels = causal().match_sentence("Heavy flow causes wider spreads");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source, "Causing Heavy Flow");
        assert_eq!(rels[0].target, "Effecting Wider Spreads");
        assert_eq!(rels[0].source_kind, NodeType::Event);
    }

    #[test]
    fn test_causal_lead_in_uses_generic_cause() {
        let rels = causal().match_sentence("Reviews help, which improves software quality");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source, GENERIC_CAUSE);
        assert_eq!(rels[0].target, "Effecting Software Quality");
    }

    #[test]
    fn test_causal_narrow_effect() {
        let rels = causal().match_sentence("Competition leads to narrow spreads");
        assert_eq!(rels[0].target, "Narrow Spread Narrowing");
    }

    #[test]
    fn test_causal_provides_which() {
        let rels = causal().match_sentence("Caching provides fast reads which helps users");
        let provided: Vec<_> = rels
            .iter()
            .filter(|r| r.source == "Causing Caching")
            .collect();
        assert_eq!(provided.len(), 1);
        assert_eq!(provided[0].target, "Effecting Fast Reads");
    }

    #[test]
    fn test_expressive_concept_split() {
        let rels = expressive().match_sentence("Narrow spreads express confidence in liquidity.");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source, "Narrow Spread Narrowing");
        assert_eq!(rels[0].target, "Liquidity Confidence");
        assert_eq!(rels[0].relation, EdgeType::Expresses);
        assert_eq!(rels[0].target_kind, NodeType::Concept);
    }

    #[test]
    fn test_expressive_without_qualifier() {
        let rels = expressive().match_sentence("Rising volume signals conviction");
        assert_eq!(rels[0].source, "Rising Volume");
        assert_eq!(rels[0].target, "Conviction");
    }

    #[test]
    fn test_families() {
        assert_eq!(action().family(), MatcherFamily::ActionTriplet);
        assert_eq!(causal().family(), MatcherFamily::Causal);
        assert_eq!(expressive().family().as_str(), "expressive");
    }
}
