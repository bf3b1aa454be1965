// file: src/retrieval/fusion.rs
// description: weighted linear fusion of semantic and lexical scores
// reference: weight * semantic + (1 - weight) * lexical, missing scores count as 0

use crate::models::{FusedResult, ScoredResult};
use std::collections::HashMap;

#[derive(Clone, Copy)]
enum Signal {
    Semantic,
    Lexical,
}

fn finite_or_zero(score: f32) -> f32 {
    if score.is_finite() { score } else { 0.0 }
}

/// Merges both result lists keyed by document id. A document present in only
/// one list keeps its single contribution; the other side is 0. Best first,
/// at most `k`.
pub fn fuse(
    semantic: &[ScoredResult],
    lexical: &[ScoredResult],
    weight: f32,
    k: usize,
) -> Vec<FusedResult> {
    let mut merged: Vec<FusedResult> = Vec::with_capacity(semantic.len() + lexical.len());
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(semantic.len() + lexical.len());

    let tagged = semantic
        .iter()
        .map(|r| (Signal::Semantic, r))
        .chain(lexical.iter().map(|r| (Signal::Lexical, r)));

    for (signal, result) in tagged {
        let slot = *slots.entry(result.doc_id.as_str()).or_insert_with(|| {
            merged.push(FusedResult {
                doc_id: result.doc_id.clone(),
                score: 0.0,
                semantic_score: 0.0,
                lexical_score: 0.0,
            });
            merged.len() - 1
        });

        let score = finite_or_zero(result.score);
        match signal {
            Signal::Semantic => merged[slot].semantic_score = score,
            Signal::Lexical => merged[slot].lexical_score = score,
        }
    }

    for entry in &mut merged {
        entry.score = weight * entry.semantic_score + (1.0 - weight) * entry.lexical_score;
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(k);
    merged
}
