//! Context rendering
//!
//! The rendered text is embedded verbatim into downstream prompts, so its
//! framing lines are fixed.

use similar::TextDiff;

use crate::domain::graph::Edge;

/// Header shared by both context forms
pub const CONTEXT_HEADER: &str = "### Retrieved Knowledge Context";

/// Line introducing the relationship list
pub const RELATIONSHIPS_INTRO: &str = "Key relationships from the document:";

/// Trailing usage line
pub const CONTEXT_FOOTER: &str = "Use this context to answer questions about the subject matter.";

/// Full context returned when no edge survives filtering
pub const NO_RELATIONSHIPS_CONTEXT: &str =
    "### Retrieved Knowledge Context\n\nNo clear relationships found for this query.";

/// Endpoint labels longer than this (in characters) are not rendered
pub const MAX_LABEL_CHARS: usize = 60;

/// Case-insensitive sequence similarity in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    f64::from(TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

/// Whether an edge is clean enough to show
///
/// Drops overlong endpoints and chained causal labels such as
/// "Causing X Which ..." that the causal patterns can produce.
pub fn is_displayable(edge: &Edge) -> bool {
    if edge.source.chars().count() > MAX_LABEL_CHARS
        || edge.target.chars().count() > MAX_LABEL_CHARS
    {
        return false;
    }
    let chained_cause = edge.source.contains("Causing")
        && (edge.source.contains("Cause") || edge.source.contains("Which"));
    !chained_cause
}

/// `- <source> <verb phrase> <target>.`
pub fn render_line(edge: &Edge) -> String {
    format!(
        "- {} {} {}.",
        edge.source,
        edge.edge_type.verb_phrase(),
        edge.target
    )
}

/// Render the context text for a set of edges, filtering undisplayable ones
///
/// Returns the text and the number of relationship lines it holds.
pub fn render_context<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> (String, usize) {
    let lines: Vec<String> = edges
        .into_iter()
        .filter(|e| is_displayable(e))
        .map(render_line)
        .collect();

    if lines.is_empty() {
        return (NO_RELATIONSHIPS_CONTEXT.to_string(), 0);
    }

    let context = format!(
        "{CONTEXT_HEADER}\n\n{RELATIONSHIPS_INTRO}\n{}\n\n{CONTEXT_FOOTER}",
        lines.join("\n")
    );
    (context, lines.len())
}
