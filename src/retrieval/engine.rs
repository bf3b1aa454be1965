// file: src/retrieval/engine.rs
// description: hybrid retrieval entry point composing lexical, semantic and fusion stages
// reference: builds once, read-only afterwards

use crate::error::Result;
use crate::models::{Document, SearchHit};
use crate::retrieval::corpus::Corpus;
use crate::retrieval::fusion::fuse;
use crate::retrieval::lexical::LexicalIndex;
use crate::retrieval::vector::score_all;
use crate::utils::{OperationTimer, Validator};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_LEXICAL_CANDIDATES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub dimension: usize,
}

/// Owns the corpus and its lexical index. Safe to share behind an `Arc`:
/// nothing mutates either structure after `initialize`.
#[derive(Debug)]
pub struct RetrievalEngine {
    corpus: Corpus,
    lexical: LexicalIndex,
    lexical_candidates: usize,
}

impl RetrievalEngine {
    /// Fails fast on an empty corpus, duplicate ids or mixed embedding sizes.
    pub fn initialize(documents: Vec<Document>) -> Result<Self> {
        let timer = OperationTimer::new("build lexical index");

        let corpus = Corpus::new(documents)?;
        let lexical = LexicalIndex::build(&corpus);

        info!(
            "Indexed {} documents ({} terms, dimension {})",
            corpus.len(),
            lexical.term_count(),
            corpus.dimension()
        );
        timer.finish_with_count(corpus.len(), "documents");

        Ok(Self {
            corpus,
            lexical,
            lexical_candidates: DEFAULT_LEXICAL_CANDIDATES,
        })
    }

    /// Size of the lexical candidate pool taken before fusion.
    pub fn with_lexical_candidates(mut self, candidates: usize) -> Self {
        self.lexical_candidates = candidates.max(1);
        self
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.corpus.len(),
            terms: self.lexical.term_count(),
            dimension: self.corpus.dimension(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Ranks the corpus for one query. Either the whole ranking is returned or
    /// an error; never a partial list.
    pub fn search(
        &self,
        query_text: &str,
        query_vector: &[f32],
        weight: f32,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        Validator::validate_weight(weight)?;
        Validator::validate_top_k(k)?;

        let semantic = score_all(query_vector, &self.corpus)?;
        let lexical = self
            .lexical
            .search(query_text, self.lexical_candidates.max(k));

        debug!(
            "Scored {} documents semantically, {} lexical candidates",
            semantic.len(),
            lexical.len()
        );

        let hits = fuse(&semantic, &lexical, weight, k)
            .into_iter()
            .filter_map(|fused| {
                self.corpus.get(&fused.doc_id).map(|document| SearchHit {
                    document: Arc::clone(document),
                    score: fused.score,
                    semantic_score: fused.semantic_score,
                    lexical_score: fused.lexical_score,
                })
            })
            .collect();

        Ok(hits)
    }
}
