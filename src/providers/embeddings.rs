// file: src/providers/embeddings.rs
// description: OpenAI-compatible HTTP embeddings client
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::EmbeddingConfig;
use crate::error::{RagError, Result};
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct HttpEmbeddingClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    normalize: bool,
}

impl HttpEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/embeddings", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            normalize: config.normalize,
        }
    }
}

/// Scales `vector` to unit length; a zero vector is returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: vec![text],
            model: &self.model,
        };

        debug!("Requesting embedding from {} for {} chars", self.url, text.len());

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Embedding(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            RagError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| RagError::Embedding("No embedding data returned".to_string()))?;

        debug!("Received embedding of dimension {}", embedding.len());

        Ok(if self.normalize {
            l2_normalize(embedding)
        } else {
            embedding
        })
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_url_joins_endpoint() {
        let client = HttpEmbeddingClient::new(&EmbeddingConfig {
            endpoint: "http://localhost:8080/v1/".to_string(),
            model: "mini".to_string(),
            api_key: None,
            normalize: true,
        });
        assert_eq!(client.url, "http://localhost:8080/v1/embeddings");
        assert_eq!(client.name(), "mini");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,0.2]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_embedding_failure() {
        let client = HttpEmbeddingClient::new(&EmbeddingConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            model: "mini".to_string(),
            api_key: None,
            normalize: false,
        });
        let err = client.embed("hello").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }
}
