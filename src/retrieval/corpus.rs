// file: src/retrieval/corpus.rs
// description: insertion-ordered, immutable document collection
// reference: internal data structures

use crate::error::{RagError, Result};
use crate::models::Document;
use std::collections::HashMap;
use std::sync::Arc;

/// Documents keyed by id, iterated in load order. Never mutated after
/// construction.
#[derive(Debug)]
pub struct Corpus {
    documents: Vec<Arc<Document>>,
    positions: HashMap<String, usize>,
    dimension: usize,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let dimension = match documents.first() {
            Some(first) => first.dimension(),
            None => return Err(RagError::EmptyCorpus),
        };

        if dimension == 0 {
            return Err(RagError::Config(format!(
                "Document {} has an empty embedding",
                documents[0].id
            )));
        }

        let mut positions = HashMap::with_capacity(documents.len());
        let mut stored = Vec::with_capacity(documents.len());

        for document in documents {
            if document.dimension() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: document.dimension(),
                });
            }
            if positions.contains_key(&document.id) {
                return Err(RagError::DuplicateDocument { id: document.id });
            }
            positions.insert(document.id.clone(), stored.len());
            stored.push(Arc::new(document));
        }

        Ok(Self {
            documents: stored,
            positions,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.positions.get(id).map(|&pos| &self.documents[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let corpus = Corpus::new(vec![
            Document::new("b", "second letter", vec![1.0, 0.0]),
            Document::new("a", "first letter", vec![0.0, 1.0]),
        ])
        .unwrap();

        let ids: Vec<&str> = corpus.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(corpus.dimension(), 2);
        assert_eq!(corpus.get("a").unwrap().text, "first letter");
        assert!(corpus.get("c").is_none());
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(matches!(Corpus::new(vec![]), Err(RagError::EmptyCorpus)));
    }

    #[test]
    fn test_mixed_dimensions_fail() {
        let result = Corpus::new(vec![
            Document::new("a", "x", vec![1.0, 0.0]),
            Document::new("b", "y", vec![1.0, 0.0, 0.0]),
        ]);
        assert!(matches!(
            result,
            Err(RagError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_duplicate_id_fails() {
        let result = Corpus::new(vec![
            Document::new("a", "x", vec![1.0]),
            Document::new("a", "y", vec![1.0]),
        ]);
        assert!(matches!(result, Err(RagError::DuplicateDocument { id }) if id == "a"));
    }

    #[test]
    fn test_empty_embedding_fails() {
        assert!(Corpus::new(vec![Document::new("a", "x", vec![])]).is_err());
    }
}
