// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod dataset;
pub mod error;
pub mod exporter;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod utils;

pub use config::{Config, DatasetConfig, EmbeddingConfig, GenerationConfig, RetrievalConfig};
pub use dataset::DatasetLoader;
pub use error::{ErrorKind, RagError, Result};
pub use exporter::{AnswerExporter, ExportedAnswer};
pub use generation::{SplitState, StreamDemultiplexer, build_prompt};
pub use models::{Answer, Document, DocumentMetadata, SearchHit, SourceDocument};
pub use pipeline::{
    ConsoleRenderer, EventSink, NullSink, QueryEvent, QueryOrchestrator, QuerySettings,
    QueryStats,
};
pub use providers::{
    EmbeddingProvider, GenerationOptions, GenerationProvider, HttpEmbeddingClient,
    HttpGenerationClient,
};
pub use retrieval::{IndexStats, RetrievalEngine, tokenize};
pub use utils::{OperationTimer, Validator};
