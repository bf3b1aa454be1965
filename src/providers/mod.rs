// file: src/providers/mod.rs
// description: embedding and generation provider contracts plus HTTP implementations
// reference: https://docs.rs/async-trait

pub mod embeddings;
pub mod generation;

use crate::error::Result;
use async_trait::async_trait;

pub use embeddings::HttpEmbeddingClient;
pub use generation::{HttpGenerationClient, SseLineDecoder};

/// Turns text into a fixed-length dense vector. Must be deterministic for a
/// given model so query vectors are comparable with the corpus.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

/// Produces text for a prompt, pushing each increment to `on_chunk` as it
/// arrives and returning the full text at the end. There is no backpressure:
/// the callback must not block.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String>;

    fn name(&self) -> &str;
}
