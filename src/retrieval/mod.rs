// file: src/retrieval/mod.rs
// description: hybrid lexical + semantic retrieval module exports
// reference: internal module structure

pub mod corpus;
pub mod engine;
pub mod fusion;
pub mod lexical;
pub mod tokenizer;
pub mod vector;

pub use corpus::Corpus;
pub use engine::{IndexStats, RetrievalEngine};
pub use fusion::fuse;
pub use lexical::LexicalIndex;
pub use tokenizer::tokenize;
pub use vector::{cosine_similarity, score_all};
