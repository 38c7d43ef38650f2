//! Intent scoring
//!
//! Every word gets a salience score from document statistics:
//!
//! ```text
//! score(w) = Φ(w)·W(w) / (1 + e^(Φ(w)/Φ0 − ρ))
//! ```
//!
//! with `Φ(w)` the word's frequency per sentence, `Φ0 = 1/coherence` and
//! `W(w)` its work cost (length, plus one when capitalized). A phrase scores
//! as its best word.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z\-]*").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]").unwrap());

/// Parameters of the intent formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentParams {
    /// Sets the burstiness baseline `Φ0 = 1/coherence`
    pub coherence: f64,
    /// Offset inside the logistic term
    pub rho: f64,
}

impl Default for IntentParams {
    fn default() -> Self {
        Self {
            coherence: 45.0,
            rho: 0.1,
        }
    }
}

/// Per-word intent scores for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenIntent {
    scores: HashMap<String, f64>,
}

impl TokenIntent {
    /// Score of an exact token
    pub fn get(&self, token: &str) -> Option<f64> {
        self.scores.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Score of a phrase: the maximum over its words
    ///
    /// Each word is looked up lower-cased first, then capitalized; unknown
    /// words count as zero and an empty phrase scores zero.
    pub fn phrase_intent(&self, phrase: &str) -> f64 {
        tokenize_words(phrase)
            .map(|token| {
                self.get(&token.to_lowercase())
                    .or_else(|| self.get(&capitalize(token)))
                    .unwrap_or(0.0)
            })
            .fold(0.0, f64::max)
    }
}

/// Words made of letters and inner hyphens
pub fn tokenize_words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// Word length, plus one for a leading capital
pub fn work_cost(word: &str) -> usize {
    let mut cost = word.chars().count();
    if word.chars().next().is_some_and(char::is_uppercase) {
        cost += 1;
    }
    cost
}

/// Score every distinct word of a document
///
/// Counts are case-sensitive, so `Code` and `code` are scored separately.
/// Scores are always finite and non-negative.
pub fn compute_token_intent(text: &str, params: IntentParams) -> TokenIntent {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in tokenize_words(text) {
        *freq.entry(token).or_default() += 1;
    }

    let num_sentences = SENTENCE_END.find_iter(text).count().max(1) as f64;
    let phi0 = 1.0 / params.coherence;

    let scores = freq
        .into_iter()
        .map(|(word, count)| {
            let phi = count as f64 / num_sentences;
            let cost = work_cost(word) as f64;
            let score = (phi * cost) / (1.0 + (phi / phi0 - params.rho).exp());
            (word.to_string(), sanitize(score))
        })
        .collect();

    TokenIntent { scores }
}

/// Score a phrase against a token table
pub fn phrase_intent(phrase: &str, scores: &TokenIntent) -> f64 {
    scores.phrase_intent(phrase)
}

// Non-finite parameters can yield NaN.
fn sanitize(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
