// file: src/models/answer.rs
// description: terminal result of a query: split generation output plus sources
// reference: produced by the query orchestrator

use crate::models::SourceDocument;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub query_id: Uuid,
    pub question: String,
    /// Text generated before the analysis-end marker
    pub analysis: String,
    /// Text generated after the analysis-end marker, control markers removed
    pub answer: String,
    pub sources: Vec<SourceDocument>,
}

impl Answer {
    /// True when the model never emitted the analysis-end marker.
    pub fn is_unsplit(&self) -> bool {
        self.answer.is_empty() && !self.analysis.is_empty()
    }
}
