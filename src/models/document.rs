// file: src/models/document.rs
// description: corpus document model with embedding and display metadata
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Display-only fields carried through retrieval untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub date: String,
    pub authors: Vec<String>,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRecord")]
pub struct Document {
    pub id: String,

    /// Passage body used for lexical indexing and prompting
    pub text: String,

    /// Precomputed dense embedding, same dimensionality across the corpus
    pub embedding: Vec<f32>,

    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

/// Flat wire shape of a dataset record. Also accepts the French field names
/// used by the published legal-corpus exports.
#[derive(Debug, Deserialize)]
struct DocumentRecord {
    id: String,
    #[serde(alias = "chunk")]
    text: String,
    #[serde(alias = "embeddings")]
    embedding: Vec<f32>,
    #[serde(default, alias = "titre")]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default, alias = "auteurs")]
    authors: Vec<String>,
    #[serde(default, alias = "dossier")]
    folder: String,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            embedding: record.embedding,
            metadata: DocumentMetadata {
                title: record.title,
                date: record.date,
                authors: record.authors,
                folder: record.folder,
            },
        }
    }
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            metadata: DocumentMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
