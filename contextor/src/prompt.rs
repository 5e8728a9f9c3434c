//! Prompt assembly: preamble + numbered passages + question.

use rag_store::Passage;

/// Behavioural instructions placed at the top of every prompt.
pub const DEFAULT_PREAMBLE: &str = r#"Answer using the context below. If unknown, say "I don't know"."#;

/// Stands in for the passages block when retrieval found nothing.
pub const NO_PASSAGES_PLACEHOLDER: &str =
    "[NO RETRIEVED PASSAGES - run the ingest tool to populate the collection]";

/// Separator between rendered passages.
pub const PASSAGE_SEPARATOR: &str = "\n---\n";

/// Builds the final prompt.
///
/// Passages are rendered as `Passage {n}: {text}` (1-indexed, input order).
/// The question is inserted verbatim.
///
/// # Example
/// ```
/// use contextor::prompt::{assemble, DEFAULT_PREAMBLE, NO_PASSAGES_PLACEHOLDER};
/// let p = assemble(DEFAULT_PREAMBLE, &[], "What happened?");
/// assert!(p.contains(NO_PASSAGES_PLACEHOLDER));
/// assert!(p.ends_with("What happened?"));
/// ```
pub fn assemble(preamble: &str, passages: &[Passage], question: &str) -> String {
    let context = if passages.is_empty() {
        NO_PASSAGES_PLACEHOLDER.to_string()
    } else {
        passages
            .iter()
            .enumerate()
            .map(|(i, p)| format!("Passage {}: {}", i + 1, p.text.as_deref().unwrap_or("")))
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR)
    };

    format!("{preamble}\n\nCONTEXT:\n{context}\n\nQUESTION:\n{question}")
}
