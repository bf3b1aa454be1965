// file: src/pipeline/events.rs
// description: typed progress events and the sink abstraction they are pushed into
// reference: push-only delivery; no backpressure towards producers

use crate::error::{ErrorKind, RagError};
use crate::models::SourceDocument;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum QueryEvent {
    IndexingStarted {
        documents: usize,
    },
    IndexingComplete {
        documents: usize,
        terms: usize,
    },
    SearchStarted {
        question: String,
    },
    Processing {
        message: String,
    },
    SourcesReady {
        documents: Vec<SourceDocument>,
    },
    #[serde(rename_all = "camelCase")]
    StreamChunk {
        pre_tag_text: String,
        post_tag_text: String,
    },
    QueryComplete,
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl QueryEvent {
    pub fn processing(message: impl Into<String>) -> Self {
        QueryEvent::Processing {
            message: message.into(),
        }
    }

    pub fn from_error(error: &RagError) -> Self {
        QueryEvent::Error {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Receives events as they happen. Implementations must return promptly:
/// `emit` is called from inside the generation stream callback.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: QueryEvent);
}

impl EventSink for UnboundedSender<QueryEvent> {
    fn emit(&self, event: QueryEvent) {
        // a dropped receiver only means nobody is watching
        let _ = self.send(event);
    }
}

impl<F> EventSink for F
where
    F: Fn(QueryEvent) + Send + Sync,
{
    fn emit(&self, event: QueryEvent) {
        self(event)
    }
}

/// Discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: QueryEvent) {}
}
