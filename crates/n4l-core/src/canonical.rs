//! Phrase canonicalization
//!
//! Pure text helpers that turn raw matched substrings into the display labels
//! used as node identities: title-cased things, verb-derived events, and
//! qualifier-first concepts.

/// Intensity verb families that map to a fixed event suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbFamily {
    /// reduce, decrease, lower, curb, cut
    Reduction,
    /// increase, raise, grow, expand, widen
    Increase,
    /// narrow, tighten, shrink, compress
    Narrowing,
}

impl VerbFamily {
    /// Classify a lowercase verb lemma into its family
    pub fn classify(verb: &str) -> Option<Self> {
        match verb {
            "reduce" | "decrease" | "lower" | "curb" | "cut" => Some(Self::Reduction),
            "increase" | "raise" | "grow" | "expand" | "widen" => Some(Self::Increase),
            "narrow" | "tighten" | "shrink" | "compress" => Some(Self::Narrowing),
            _ => None,
        }
    }

    /// All verbs that belong to a family, in declaration order
    pub fn verbs(&self) -> &'static [&'static str] {
        match self {
            Self::Reduction => &["reduce", "decrease", "lower", "curb", "cut"],
            Self::Increase => &["increase", "raise", "grow", "expand", "widen"],
            Self::Narrowing => &["narrow", "tighten", "shrink", "compress"],
        }
    }

    /// Get all families
    pub fn all() -> &'static [VerbFamily] {
        &[Self::Reduction, Self::Increase, Self::Narrowing]
    }
}

/// Collapse whitespace runs and title-case every word
///
/// A letter is upper-cased when it follows a non-letter and lower-cased
/// otherwise, so `"non-linear  gains"` becomes `"Non-Linear Gains"`.
pub fn titleize(text: &str) -> String {
    let collapsed = normalize_space(text);
    let mut out = String::with_capacity(collapsed.len());
    let mut prev_cased = false;

    for c in collapsed.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }

    out
}

/// Collapse all whitespace runs to a single space and trim the ends
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Naive English singularization of a single word
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if lower.ends_with("ies") && word.chars().count() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("sses") {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Gerund form of a verb lemma (`cause` -> `causing`, `tie` -> `tying`)
pub fn gerund(lemma: &str) -> String {
    let lemma = lemma.trim();
    if lemma.is_empty() {
        return String::new();
    }

    if let Some(stem) = lemma.strip_suffix("ie") {
        format!("{stem}ying")
    } else if lemma.ends_with('e') && lemma != "be" && lemma != "see" {
        format!("{}ing", &lemma[..lemma.len() - 1])
    } else {
        format!("{lemma}ing")
    }
}

/// Build an event label from a verb and an optional object
///
/// Intensity verbs produce `"<Object> Reduction"`, `"<Object> Increase"` or
/// `"<Singular Object> Narrowing"`; any other verb produces
/// `"<Gerund> <Object>"`.
pub fn phrase_from_verb_object(verb: &str, object: Option<&str>) -> String {
    let verb = verb.trim().to_lowercase();

    let Some(object) = object.filter(|o| !o.is_empty()) else {
        return titleize(&gerund(&verb));
    };
    let object = titleize(object);

    match VerbFamily::classify(&verb) {
        Some(VerbFamily::Reduction) => format!("{object} Reduction"),
        Some(VerbFamily::Increase) => format!("{object} Increase"),
        Some(VerbFamily::Narrowing) => {
            let mut parts: Vec<String> = object.split_whitespace().map(String::from).collect();
            if let Some(last) = parts.last_mut() {
                *last = singularize(last);
            }
            format!("{} Narrowing", parts.join(" "))
        }
        None => format!("{} {}", titleize(&gerund(&verb)), object),
    }
}

/// Build a concept label from a head noun phrase and an optional qualifier
///
/// The qualifier comes first: head `confidence` with qualifier `liquidity`
/// yields `"Liquidity Confidence"`.
pub fn phrase_from_head_and_modifier(head: &str, modifier: Option<&str>) -> String {
    let head = titleize(head);
    match modifier.filter(|m| !m.is_empty()) {
        Some(modifier) => format!("{} {}", titleize(modifier), head),
        None => head,
    }
}

/// Build a thing label (title-cased noun phrase)
pub fn thing_phrase(text: &str) -> String {
    titleize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("code reviews"), "Code Reviews");
        assert_eq!(titleize("  market   MAKERS \n spreads "), "Market Makers Spreads");
        assert_eq!(titleize("non-linear gains"), "Non-Linear Gains");
        assert_eq!(titleize(""), "");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("Spreads"), "Spread");
        assert_eq!(singularize("Policies"), "Policy");
        assert_eq!(singularize("Classes"), "Class");
        assert_eq!(singularize("Glass"), "Glass");
        assert_eq!(singularize("ies"), "ie");
        assert_eq!(singularize("Margin"), "Margin");
    }

    #[test]
    fn test_gerund() {
        assert_eq!(gerund("cause"), "causing");
        assert_eq!(gerund("effect"), "effecting");
        assert_eq!(gerund("tie"), "tying");
        assert_eq!(gerund("see"), "seeing");
        assert_eq!(gerund("  "), "");
    }

    #[test]
    fn test_event_phrase_families() {
        assert_eq!(phrase_from_verb_object("reduce", Some("bugs")), "Bugs Reduction");
        assert_eq!(phrase_from_verb_object("CUT", Some("costs")), "Costs Reduction");
        assert_eq!(phrase_from_verb_object("widen", Some("gaps")), "Gaps Increase");
        assert_eq!(
            phrase_from_verb_object("narrow", Some("bid ask spreads")),
            "Bid Ask Spread Narrowing"
        );
        assert_eq!(
            phrase_from_verb_object("effect", Some("software quality")),
            "Effecting Software Quality"
        );
    }

    #[test]
    fn test_event_phrase_without_object() {
        assert_eq!(phrase_from_verb_object("cause", None), "Causing");
        assert_eq!(phrase_from_verb_object("cause", Some("")), "Causing");
    }

    #[test]
    fn test_concept_phrase() {
        assert_eq!(
            phrase_from_head_and_modifier("confidence", Some("liquidity")),
            "Liquidity Confidence"
        );
        assert_eq!(phrase_from_head_and_modifier("market depth", None), "Market Depth");
    }

    #[test]
    fn test_verb_family_roundtrip() {
        for family in VerbFamily::all() {
            for verb in family.verbs() {
                assert_eq!(VerbFamily::classify(verb), Some(*family));
            }
        }
        assert_eq!(VerbFamily::classify("improve"), None);
    }
}
