// file: src/generation/prompt.rs
// description: sentinel literals and prompt construction for the generation model
// reference: wire-level contract with the model's special tokens; must match exactly

use crate::models::SearchHit;

pub const QUERY_START: &str = "<|query_start|>";
pub const QUERY_END: &str = "<|query_end|>";
pub const SOURCE_START: &str = "<|source_start|>";
pub const SOURCE_END: &str = "<|source_end|>";
pub const SOURCE_ID_START: &str = "<|source_id_start|>";
pub const SOURCE_ID_END: &str = "<|source_id_end|>";
pub const ANALYSIS_START: &str = "<|source_analysis_start|>";

/// Splits the stream into analysis (before) and answer (after).
pub const ANALYSIS_END: &str = "<|source_analysis_end|>";

pub const ANSWER_START: &str = "<|answer_start|>";
pub const ANSWER_END: &str = "<|answer_end|>";
pub const END_OF_TEXT: &str = "<|end_of_text|>";

/// Payload-free markers removed from streamed output wherever they appear.
pub const NO_OP_MARKERS: [&str; 3] = [ANSWER_START, ANSWER_END, END_OF_TEXT];

/// Wraps one retrieved passage in source and source-id markers.
pub fn format_source(id: &str, text: &str) -> String {
    format!("{SOURCE_START}{SOURCE_ID_START}{id}{SOURCE_ID_END}{text}{SOURCE_END}")
}

/// Question block, one source block per line in rank order, then an open
/// analysis section for the model to continue.
pub fn build_prompt(question: &str, sources: &[SearchHit]) -> String {
    let context = sources
        .iter()
        .map(|hit| format_source(&hit.document.id, &hit.document.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{QUERY_START}{question}{QUERY_END}\n{context}\n{ANALYSIS_START}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn hit(id: &str, text: &str) -> SearchHit {
        SearchHit {
            document: Arc::new(Document::new(id, text, vec![1.0])),
            score: 1.0,
            semantic_score: 1.0,
            lexical_score: 0.0,
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt(
            "Quel tribunal ?",
            &[hit("A-1", "premier passage"), hit("B-2", "second passage")],
        );

        assert_eq!(
            prompt,
            "<|query_start|>Quel tribunal ?<|query_end|>\n\
             <|source_start|><|source_id_start|>A-1<|source_id_end|>premier passage<|source_end|>\n\
             <|source_start|><|source_id_start|>B-2<|source_id_end|>second passage<|source_end|>\n\
             <|source_analysis_start|>"
        );
    }

    #[test]
    fn test_prompt_leaves_analysis_open() {
        let prompt = build_prompt("q", &[hit("x", "y")]);
        assert!(prompt.ends_with(ANALYSIS_START));
        assert!(!prompt.contains(ANALYSIS_END));
    }

    #[test]
    fn test_prompt_without_sources() {
        assert_eq!(
            build_prompt("q", &[]),
            "<|query_start|>q<|query_end|>\n\n<|source_analysis_start|>"
        );
    }
}
