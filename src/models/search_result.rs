// file: src/models/search_result.rs
// description: Scored, fused and display-ready retrieval results
// reference: Used by the lexical, semantic and fusion stages

use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One document's score from a single signal (lexical or semantic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub doc_id: String,
    pub score: f32,
}

impl ScoredResult {
    pub fn new(doc_id: impl Into<String>, score: f32) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

/// Weighted combination of both signals for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub doc_id: String,
    pub score: f32,
    pub semantic_score: f32,
    pub lexical_score: f32,
}

/// A ranked corpus entry returned by the retrieval engine.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub document: Arc<Document>,
    pub score: f32,
    pub semantic_score: f32,
    pub lexical_score: f32,
}

impl SearchHit {
    pub fn id(&self) -> &str {
        &self.document.id
    }
}

/// What the presentation layer receives for a retrieved source: everything
/// but the embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub title: String,
    pub date: String,
    pub authors: Vec<String>,
    pub folder: String,
    pub text: String,
    pub score: f32,
}

impl From<&SearchHit> for SourceDocument {
    fn from(hit: &SearchHit) -> Self {
        let doc = hit.document.as_ref();
        Self {
            id: doc.id.clone(),
            title: doc.metadata.title.clone(),
            date: doc.metadata.date.clone(),
            authors: doc.metadata.authors.clone(),
            folder: doc.metadata.folder.clone(),
            text: doc.text.clone(),
            score: hit.score,
        }
    }
}

impl SourceDocument {
    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.text.chars().count() > max_content_len {
            let cut: String = self.text.chars().take(max_content_len).collect();
            format!("{}...", cut)
        } else {
            self.text.clone()
        };

        format!(
            "Score: {:.4} | {} ({})\n{}\n",
            self.score, self.id, self.title, content_preview
        )
    }
}
