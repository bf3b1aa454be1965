// file: src/retrieval/vector.rs
// description: exhaustive cosine similarity scoring against every corpus embedding
// reference: flat scan; the corpus is small and fixed

use crate::error::{RagError, Result};
use crate::models::ScoredResult;
use crate::retrieval::corpus::Corpus;

/// `dot(a, b) / (|a| * |b|)`. No epsilon: a zero-norm input yields a
/// non-finite value, which fusion treats as 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch {
            expected: b.len(),
            actual: a.len(),
        });
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&x, &y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// One result per document, in corpus order. Truncation happens after fusion.
pub fn score_all(query: &[f32], corpus: &Corpus) -> Result<Vec<ScoredResult>> {
    if query.len() != corpus.dimension() {
        return Err(RagError::DimensionMismatch {
            expected: corpus.dimension(),
            actual: query.len(),
        });
    }

    corpus
        .iter()
        .map(|doc| {
            cosine_similarity(query, &doc.embedding)
                .map(|score| ScoredResult::new(doc.id.clone(), score))
        })
        .collect()
}
