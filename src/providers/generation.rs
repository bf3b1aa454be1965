// file: src/providers/generation.rs
// description: OpenAI-compatible streaming completions client over server-sent events
// reference: https://platform.openai.com/docs/api-reference/completions

use crate::config::GenerationConfig;
use crate::error::{RagError, Result};
use crate::providers::{GenerationOptions, GenerationProvider};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// One parsed server-sent-event line.
#[derive(Debug, PartialEq)]
pub enum SseEvent {
    Delta(String),
    Done,
    Ignored,
}

/// Reassembles newline-terminated lines from arbitrary byte chunks, so a
/// multibyte character split across network reads is decoded intact.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let text = String::from_utf8_lossy(&line);
            lines.push(text.trim_end_matches(['\r', '\n']).to_string());
        }
        lines
    }

    /// Whatever is left once the body has ended without a final newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).trim_end().to_string())
    }
}

pub fn parse_sse_line(line: &str) -> Result<SseEvent> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(SseEvent::Ignored);
    };
    let payload = payload.trim();

    if payload == DONE_MARKER {
        return Ok(SseEvent::Done);
    }
    if payload.is_empty() {
        return Ok(SseEvent::Ignored);
    }

    let chunk: CompletionChunk = serde_json::from_str(payload).map_err(|e| {
        RagError::Generation(format!("Malformed stream event: {}", e))
    })?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .map(|choice| SseEvent::Delta(choice.text))
        .unwrap_or(SseEvent::Ignored))
}

pub struct HttpGenerationClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerationClient {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/completions", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: true,
        };

        debug!(
            "Requesting completion from {} ({} prompt chars, max {} tokens)",
            self.url,
            prompt.len(),
            options.max_tokens
        );

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            RagError::Generation(format!("Failed to send completion request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Generation(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseLineDecoder::new();
        let mut generated = String::new();
        let mut chunks = 0usize;

        'read: while let Some(bytes) = stream.next().await {
            let bytes = bytes
                .map_err(|e| RagError::Generation(format!("Stream interrupted: {}", e)))?;

            for line in decoder.push(&bytes) {
                match parse_sse_line(&line)? {
                    SseEvent::Delta(text) => {
                        chunks += 1;
                        on_chunk(&text);
                        generated.push_str(&text);
                    }
                    SseEvent::Done => break 'read,
                    SseEvent::Ignored => {}
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if let SseEvent::Delta(text) = parse_sse_line(&line)? {
                on_chunk(&text);
                generated.push_str(&text);
            } else if !line.is_empty() {
                warn!("Discarding trailing stream data: {}", line);
            }
        }

        debug!("Generation finished: {} chunks, {} chars", chunks, generated.len());
        Ok(generated)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
