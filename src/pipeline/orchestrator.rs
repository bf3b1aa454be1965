// file: src/pipeline/orchestrator.rs
// description: coordinates embedding, hybrid retrieval, prompting and streamed generation
// reference: one query at a time per orchestrator; events pushed to an EventSink

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::generation::{StreamDemultiplexer, build_prompt};
use crate::models::{Answer, Document, SearchHit, SourceDocument};
use crate::pipeline::events::{EventSink, QueryEvent};
use crate::providers::{EmbeddingProvider, GenerationOptions, GenerationProvider};
use crate::retrieval::RetrievalEngine;
use crate::utils::{OperationTimer, Validator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

const SLOW_GENERATION: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub top_k: usize,
    pub lexical_candidates: usize,
    pub generation: GenerationOptions,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            lexical_candidates: crate::retrieval::engine::DEFAULT_LEXICAL_CANDIDATES,
            generation: GenerationOptions::default(),
        }
    }
}

impl From<&Config> for QuerySettings {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.retrieval.top_k,
            lexical_candidates: config.retrieval.lexical_candidates,
            generation: GenerationOptions {
                max_tokens: config.generation.max_tokens,
                temperature: config.generation.temperature,
            },
        }
    }
}

pub struct QueryOrchestrator {
    engine: Arc<RetrievalEngine>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    settings: QuerySettings,
    in_flight: Mutex<()>,
}

impl QueryOrchestrator {
    pub fn new(
        engine: Arc<RetrievalEngine>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        settings: QuerySettings,
    ) -> Self {
        Self {
            engine,
            embedder,
            generator,
            settings,
            in_flight: Mutex::new(()),
        }
    }

    /// Builds the retrieval engine from `documents`, reporting through `sink`.
    pub fn initialize(
        documents: Vec<Document>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        settings: QuerySettings,
        sink: &dyn EventSink,
    ) -> Result<Self> {
        sink.emit(QueryEvent::IndexingStarted {
            documents: documents.len(),
        });

        let engine = match RetrievalEngine::initialize(documents) {
            Ok(engine) => engine.with_lexical_candidates(settings.lexical_candidates),
            Err(e) => {
                error!("Indexing failed: {}", e);
                sink.emit(QueryEvent::from_error(&e));
                return Err(e);
            }
        };

        let stats = engine.stats();
        sink.emit(QueryEvent::IndexingComplete {
            documents: stats.documents,
            terms: stats.terms,
        });

        Ok(Self::new(Arc::new(engine), embedder, generator, settings))
    }

    pub fn engine(&self) -> &Arc<RetrievalEngine> {
        &self.engine
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// Embeds `question` and ranks the corpus against it.
    pub async fn retrieve(
        &self,
        question: &str,
        weight: f32,
        k: usize,
        sink: &dyn EventSink,
    ) -> Result<Vec<SearchHit>> {
        Validator::validate_question(question)?;
        Validator::validate_weight(weight)?;

        sink.emit(QueryEvent::processing("Embedding query"));
        let query_vector = self.embedder.embed(question).await.map_err(|e| match e {
            RagError::Embedding(_) => e,
            other => RagError::Embedding(format!("{}: {}", self.embedder.name(), other)),
        })?;

        sink.emit(QueryEvent::processing("Searching corpus"));
        let timer = OperationTimer::new("hybrid search");
        let hits = self.engine.search(question, &query_vector, weight, k)?;
        timer.finish_with_count(hits.len(), "hits");

        Ok(hits)
    }

    /// Runs one question end to end. A second call while one is in flight
    /// fails with `QueryInProgress` rather than interleaving.
    pub async fn run_query(
        &self,
        question: &str,
        weight: f32,
        sink: &dyn EventSink,
    ) -> Result<Answer> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            let err = RagError::QueryInProgress;
            sink.emit(QueryEvent::from_error(&err));
            return Err(err);
        };

        let query_id = Uuid::new_v4();
        let span = info_span!("query", %query_id);

        match self.execute(query_id, question, weight, sink).instrument(span).await {
            Ok(answer) => {
                sink.emit(QueryEvent::QueryComplete);
                Ok(answer)
            }
            Err(e) => {
                error!("Query {} failed: {}", query_id, e);
                sink.emit(QueryEvent::from_error(&e));
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        query_id: Uuid,
        question: &str,
        weight: f32,
        sink: &dyn EventSink,
    ) -> Result<Answer> {
        info!("Running query (weight {:.2}, top {})", weight, self.settings.top_k);
        sink.emit(QueryEvent::SearchStarted {
            question: question.to_string(),
        });

        let hits = self
            .retrieve(question, weight, self.settings.top_k, sink)
            .await?;

        let sources: Vec<SourceDocument> = hits.iter().map(SourceDocument::from).collect();
        sink.emit(QueryEvent::SourcesReady {
            documents: sources.clone(),
        });

        let prompt = build_prompt(question, &hits);
        debug!("Prompt built with {} sources, {} chars", hits.len(), prompt.len());

        sink.emit(QueryEvent::processing("Generating answer"));
        let timer = OperationTimer::new("generation");

        let mut demux = StreamDemultiplexer::new();
        let mut on_chunk = |chunk: &str| {
            let snapshot = demux.push(chunk);
            sink.emit(QueryEvent::StreamChunk {
                pre_tag_text: snapshot.pre_tag.to_string(),
                post_tag_text: snapshot.post_tag.to_string(),
            });
        };

        let generated = self
            .generator
            .generate(&prompt, &self.settings.generation, &mut on_chunk)
            .await
            .map_err(|e| match e {
                RagError::Generation(_) => e,
                other => RagError::Generation(format!("{}: {}", self.generator.name(), other)),
            })?;

        timer.warn_if_slow(SLOW_GENERATION);
        timer.finish_with_count(generated.len(), "chars");

        let shown = demux.pre_tag().len() + demux.post_tag().len();
        let snapshot = demux.finish();
        if snapshot.pre_tag.len() + snapshot.post_tag.len() > shown {
            sink.emit(QueryEvent::StreamChunk {
                pre_tag_text: snapshot.pre_tag.to_string(),
                post_tag_text: snapshot.post_tag.to_string(),
            });
        }

        let (analysis, answer) = demux.into_parts();
        Ok(Answer {
            query_id,
            question: question.to_string(),
            analysis,
            answer,
            sources,
        })
    }
}
