// file: src/dataset/loader.rs
// description: loads the precomputed corpus (text + embeddings) as a JSON array
// reference: local path via serde_json reader, remote source via reqwest

use crate::config::DatasetConfig;
use crate::error::{RagError, Result};
use crate::models::Document;
use crate::utils::{OperationTimer, Validator};
use reqwest::Client;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

pub struct DatasetLoader {
    source: String,
    client: Client,
}

impl DatasetLoader {
    pub fn new(config: &DatasetConfig) -> Self {
        Self::from_source(config.source.clone())
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            client: Client::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_remote(&self) -> bool {
        Validator::is_remote_source(&self.source)
    }

    pub async fn load(&self) -> Result<Vec<Document>> {
        let timer = OperationTimer::new("load dataset");

        let documents = if self.is_remote() {
            self.fetch_remote().await?
        } else {
            read_local(Path::new(&self.source))?
        };

        info!("Loaded {} documents from {}", documents.len(), self.source);
        timer.finish_with_count(documents.len(), "documents");
        Ok(documents)
    }

    async fn fetch_remote(&self) -> Result<Vec<Document>> {
        debug!("Fetching dataset from {}", self.source);

        let response = self
            .client
            .get(&self.source)
            .send()
            .await
            .map_err(|e| RagError::Dataset(format!("Failed to fetch {}: {}", self.source, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Dataset(format!(
                "Dataset request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RagError::Dataset(format!("Failed to read dataset body: {}", e)))?;

        parse_documents(&body)
    }
}

fn read_local(path: &Path) -> Result<Vec<Document>> {
    debug!("Reading dataset from {}", path.display());

    let file = File::open(path)
        .map_err(|e| RagError::Dataset(format!("Cannot open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RagError::Dataset(format!("Invalid dataset {}: {}", path.display(), e)))
}

/// Parses a JSON array of document records.
pub fn parse_documents(bytes: &[u8]) -> Result<Vec<Document>> {
    serde_json::from_slice(bytes).map_err(|e| RagError::Dataset(format!("Invalid dataset: {}", e)))
}
