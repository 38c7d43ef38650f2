//! Sentence splitting and clause cleanup

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::config::alternation;

/// Sentence-final punctuation followed by whitespace
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Any word starting with "narrow" (narrow, narrows, narrowing, ...)
static NARROW_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnarrow\w*\b").unwrap());

/// Characters trimmed from both ends of a cleaned clause
const CLAUSE_TRIM: &[char] = &[',', ';', ':', ' '];

/// Split text into sentences on `.`, `!` or `?` followed by whitespace
///
/// The punctuation stays with the sentence it ends; blank pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut pieces = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        pieces.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether a clause mentions narrowing
pub fn mentions_narrowing(clause: &str) -> bool {
    NARROW_WORD.is_match(clause)
}

/// Strips a leading connective word and surrounding punctuation from clauses
#[derive(Debug, Clone)]
pub struct ClauseCleaner {
    leading_connective: Option<Regex>,
}

impl ClauseCleaner {
    /// Build a cleaner for the given connective words
    pub fn new(connectives: &[String]) -> Result<Self> {
        let alt = alternation(connectives);
        let leading_connective = if alt.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"(?i)^\b(?:{alt})\b[\s,]*"))?)
        };
        Ok(Self { leading_connective })
    }

    /// Clean one captured clause
    ///
    /// `"which causes spreads, "` becomes `"causes spreads"`.
    pub fn clean(&self, clause: &str) -> String {
        let clause = clause.trim();
        let clause = match &self.leading_connective {
            Some(re) => match re.find(clause) {
                Some(m) => &clause[m.end()..],
                None => clause,
            },
            None => clause,
        };
        clause.trim_matches(CLAUSE_TRIM).to_string()
    }
}

/// Splits a concept clause into a head and a prepositional qualifier
#[derive(Debug, Clone)]
pub struct QualifierSplitter {
    patterns: Vec<Regex>,
}

impl QualifierSplitter {
    /// Build a splitter trying each preposition in order
    pub fn new(prepositions: &[String]) -> Result<Self> {
        let patterns = prepositions
            .iter()
            .map(|p| alternation(std::slice::from_ref(p)))
            .filter(|p| !p.is_empty())
            .map(|p| Regex::new(&format!(r"(?i)(.+?)\s+(?:{p})\s+(.+)")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// `"confidence in liquidity"` -> `("confidence", Some("liquidity"))`
    pub fn split<'a>(&self, clause: &'a str) -> (&'a str, Option<&'a str>) {
        for re in &self.patterns {
            if let Some(caps) = re.captures(clause) {
                if let (Some(head), Some(qualifier)) = (caps.get(1), caps.get(2)) {
                    return (head.as_str(), Some(qualifier.as_str()));
                }
            }
        }
        (clause, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractorConfig;

    fn cleaner() -> ClauseCleaner {
        ClauseCleaner::new(&ExtractorConfig::default().connectives).unwrap()
    }

    #[test]
    fn test_split_sentences() {
        let text = "  Spreads narrow. Makers quote!  Why?\nBecause flow is heavy.  ";
        assert_eq!(
            split_sentences(text),
            vec![
                "Spreads narrow.",
                "Makers quote!",
                "Why?",
                "Because flow is heavy."
            ]
        );
    }

    #[test]
    fn test_split_sentences_keeps_inline_punctuation() {
        assert_eq!(split_sentences("v1.2 ships today"), vec!["v1.2 ships today"]);
        assert!(split_sentences("   ").is_empty());
        assert_eq!(split_sentences("a. . b"), vec!["a.", ".", "b"]);
    }

    #[test]
    fn test_clean_strips_leading_connective() {
        let c = cleaner();
        assert_eq!(c.clean("which causes market makers"), "causes market makers");
        assert_eq!(c.clean("  Therefore, costs fall;"), "costs fall");
        assert_eq!(c.clean("thatch roofs"), "thatch roofs");
        assert_eq!(c.clean(", activity ,"), "activity");
        assert_eq!(c.clean("which"), "");
    }

    #[test]
    fn test_clean_only_strips_one_connective() {
        assert_eq!(cleaner().clean("and then prices rise"), "then prices rise");
    }

    #[test]
    fn test_mentions_narrowing() {
        assert!(mentions_narrowing("makers narrow spreads"));
        assert!(mentions_narrowing("Narrowing margins"));
        assert!(!mentions_narrowing("a wide spread"));
    }

    #[test]
    fn test_qualifier_split() {
        let splitter = QualifierSplitter::new(&ExtractorConfig::default().qualifier_prepositions)
            .unwrap();
        assert_eq!(
            splitter.split("confidence in liquidity"),
            ("confidence", Some("liquidity"))
        );
        assert_eq!(
            splitter.split("depth of the book"),
            ("depth", Some("the book"))
        );
        assert_eq!(
            splitter.split("lack of trust in markets"),
            ("lack of trust", Some("markets"))
        );
        assert_eq!(splitter.split("resilience"), ("resilience", None));
    }
}
