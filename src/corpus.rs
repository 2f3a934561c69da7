//! Merge normalized raw texts into the summarization corpus.
//!
//! Mail first, then Tasks; the calendar feeds only the rendered context and
//! is deliberately excluded from AI input. Sections whose source came back
//! `Empty` or `Failed` contribute nothing, so an all-quiet day produces an
//! empty corpus and the summarizer can short-circuit.

/// One labeled corpus section. `body: None` (or whitespace-only) means the
/// section is skipped entirely.
#[derive(Debug, Clone, Copy)]
pub struct CorpusSection<'a> {
    pub label: &'a str,
    pub body: Option<&'a str>,
}

/// Deterministic, order-preserving merge: same inputs, same corpus string.
pub fn merge_corpus(sections: &[CorpusSection<'_>]) -> String {
    sections
        .iter()
        .filter_map(|section| {
            let body = section.body?.trim();
            if body.is_empty() {
                return None;
            }
            Some(format!("--- {} ---\n{}", section.label, body))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
