// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{RagError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Local path or http(s) URL of the JSON document array
    pub source: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub normalize: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: usize,
    #[serde(default)]
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub semantic_weight: f32,
    pub lexical_candidates: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            semantic_weight: 0.7,
            lexical_candidates: 10,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("HYBRID_RAG")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| RagError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            dataset: DatasetConfig {
                source: "data/dataset.json".to_string(),
            },
            embedding: EmbeddingConfig {
                endpoint: "http://localhost:8080/v1".to_string(),
                model: "gte-multilingual-base".to_string(),
                api_key: None,
                normalize: true,
            },
            generation: GenerationConfig {
                endpoint: "http://localhost:8081/v1".to_string(),
                model: "Pleias-Pico".to_string(),
                api_key: None,
                max_tokens: 1024,
                temperature: 0.0,
            },
            retrieval: RetrievalConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_top_k(self.retrieval.top_k)
            .map_err(|e| RagError::Config(e.to_string()))?;
        Validator::validate_weight(self.retrieval.semantic_weight)
            .map_err(|e| RagError::Config(e.to_string()))?;

        if self.retrieval.lexical_candidates == 0 {
            return Err(RagError::Config(
                "lexical_candidates must be greater than 0".to_string(),
            ));
        }

        if self.generation.max_tokens == 0 {
            return Err(RagError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.embedding.endpoint)
            .map_err(|e| RagError::Config(e.to_string()))?;
        Validator::validate_url(&self.generation.endpoint)
            .map_err(|e| RagError::Config(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.generation.max_tokens, 1024);
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let mut config = Config::default_config();
        config.retrieval.semantic_weight = 1.5;
        assert!(matches!(config.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let mut config = Config::default_config();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[dataset]
source = "corpus.json"

[embedding]
endpoint = "http://127.0.0.1:9000/v1"
model = "mini"

[generation]
endpoint = "http://127.0.0.1:9001/v1"
model = "pico"
max_tokens = 256

[retrieval]
top_k = 5
semantic_weight = 0.5
lexical_candidates = 20
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.dataset.source, "corpus.json");
        assert!(config.embedding.normalize);
        assert_eq!(config.embedding.api_key, None);
        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.lexical_candidates, 20);
    }
}
