// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: query orchestration, progress events and console rendering

pub mod events;
mod orchestrator;
mod progress;

pub use events::{EventSink, NullSink, QueryEvent};
pub use orchestrator::{QueryOrchestrator, QuerySettings};
pub use progress::{ConsoleRenderer, QueryStats};
