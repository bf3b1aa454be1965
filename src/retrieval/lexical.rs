// file: src/retrieval/lexical.rs
// description: inverted term index with tf-idf style scoring
// reference: term -> posting set, scores normalized by the best candidate

use crate::models::ScoredResult;
use crate::retrieval::corpus::Corpus;
use crate::retrieval::tokenizer::tokenize;
use std::collections::HashMap;
use tracing::debug;

/// Inverted index over document bodies. A document position is listed under a
/// term iff the term occurs in that document's tokenized body.
#[derive(Debug)]
pub struct LexicalIndex {
    postings: HashMap<String, Vec<usize>>,
    term_frequencies: Vec<HashMap<String, u32>>,
    doc_ids: Vec<String>,
}

impl LexicalIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        let mut term_frequencies = Vec::with_capacity(corpus.len());
        let mut doc_ids = Vec::with_capacity(corpus.len());

        for (position, document) in corpus.iter().enumerate() {
            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for term in tokenize(&document.text) {
                *frequencies.entry(term).or_insert(0) += 1;
            }

            for term in frequencies.keys() {
                postings.entry(term.clone()).or_default().push(position);
            }

            term_frequencies.push(frequencies);
            doc_ids.push(document.id.clone());
        }

        debug!(
            "Built lexical index: {} documents, {} distinct terms",
            doc_ids.len(),
            postings.len()
        );

        Self {
            postings,
            term_frequencies,
            doc_ids,
        }
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    /// Scores documents sharing terms with `query`, best first, at most `k`.
    ///
    /// Each query term adds `tf * ln(N / (df + 1))` to every document in its
    /// posting set; totals are then divided by the largest total (or by 1 when
    /// that maximum is 0). Unknown terms contribute nothing.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredResult> {
        let total_docs = self.doc_ids.len() as f32;

        // (position, score) in first-seen order, so ties stay stable
        let mut scores: Vec<(usize, f32)> = Vec::new();
        let mut slots: HashMap<usize, usize> = HashMap::new();

        for term in tokenize(query) {
            let Some(posting) = self.postings.get(&term) else {
                continue;
            };
            // +1 dampening is intentional
            let idf = (total_docs / (posting.len() as f32 + 1.0)).ln();

            for &position in posting {
                let tf = self.term_frequencies[position]
                    .get(&term)
                    .copied()
                    .unwrap_or(0) as f32;

                let slot = *slots.entry(position).or_insert_with(|| {
                    scores.push((position, 0.0));
                    scores.len() - 1
                });
                scores[slot].1 += tf * idf;
            }
        }

        if scores.is_empty() {
            return Vec::new();
        }

        let max_score = scores
            .iter()
            .map(|&(_, score)| score)
            .fold(f32::NEG_INFINITY, f32::max);
        let divisor = if max_score == 0.0 { 1.0 } else { max_score };

        let mut results: Vec<ScoredResult> = scores
            .into_iter()
            .map(|(position, score)| {
                ScoredResult::new(self.doc_ids[position].clone(), score / divisor)
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use pretty_assertions::assert_eq;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            Document::new("d1", "Rust ownership and borrowing, rust!", vec![1.0]),
            Document::new("d2", "Python garbage collection", vec![1.0]),
            Document::new("d3", "Java garbage collection virtual machine", vec![1.0]),
            Document::new("d4", "The rust compiler", vec![1.0]),
        ])
        .unwrap()
    }

    fn ids(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.doc_id.as_str()).collect()
    }

    #[test]
    fn test_postings_built_per_distinct_term() {
        let index = LexicalIndex::build(&corpus());

        assert_eq!(index.document_frequency("rust"), 2);
        assert_eq!(index.document_frequency("garbage"), 2);
        assert_eq!(index.document_frequency("ownership"), 1);
        // "and" is kept (3 chars), "the" too
        assert_eq!(index.document_frequency("and"), 1);
        assert_eq!(index.document_frequency("missing"), 0);
    }

    #[test]
    fn test_term_in_single_document() {
        let index = LexicalIndex::build(&corpus());
        let results = index.search("ownership", 10);

        assert_eq!(ids(&results), vec!["d1"]);
        assert!(results[0].score > 0.0);
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_unknown_term_returns_empty() {
        let index = LexicalIndex::build(&corpus());
        assert!(index.search("haskell", 10).is_empty());
        assert!(index.search("", 10).is_empty());
    }

    #[test]
    fn test_term_frequency_weights_and_normalization() {
        let index = LexicalIndex::build(&corpus());
        let results = index.search("rust", 10);

        assert_eq!(ids(&results), vec!["d1", "d4"]);
        assert_eq!(results[0].score, 1.0);
        assert!((results[1].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ties_keep_first_seen_order_and_truncate() {
        let index = LexicalIndex::build(&corpus());
        let results = index.search("rust collection", 10);

        assert_eq!(ids(&results), vec!["d1", "d4", "d2", "d3"]);

        let top2 = index.search("rust collection", 2);
        assert_eq!(ids(&top2), vec!["d1", "d4"]);
    }

    #[test]
    fn test_raw_score_follows_dampened_idf() {
        // one matching doc: normalized score is 1, so compare two terms instead
        let index = LexicalIndex::build(&corpus());
        let results = index.search("ownership garbage", 10);

        let ownership = (4.0f32 / 2.0).ln();
        let garbage = (4.0f32 / 3.0).ln();
        assert_eq!(ids(&results), vec!["d1", "d2", "d3"]);
        assert!((results[1].score - garbage / ownership).abs() < 1e-6);
    }

    #[test]
    fn test_term_in_every_document_stays_finite() {
        let corpus = Corpus::new(vec![
            Document::new("a", "common alpha", vec![1.0]),
            Document::new("b", "common beta", vec![1.0]),
            Document::new("c", "common gamma", vec![1.0]),
        ])
        .unwrap();
        let index = LexicalIndex::build(&corpus);
        let results = index.search("common", 10);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score.is_finite()));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_negative_scores_still_ranked_descending() {
        let corpus = Corpus::new(vec![
            Document::new("a", "common", vec![1.0]),
            Document::new("b", "common common", vec![1.0]),
            Document::new("c", "common other", vec![1.0]),
        ])
        .unwrap();
        let index = LexicalIndex::build(&corpus);

        // raw scores are all negative; dividing by the negative maximum
        // gives the two-occurrence document the largest normalized score
        let results = index.search("common", 10);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results[0].doc_id, "b");
        assert_eq!(results[0].score, 2.0);

        let top = index.search("common", 2);
        let ids: Vec<&str> = top.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
