// file: src/pipeline/progress.rs
// description: console rendering of query events with a spinner and stream statistics
// reference: uses indicatif for the spinner and prints only newly streamed text

use crate::models::SourceDocument;
use crate::pipeline::events::QueryEvent;
use crate::utils::logging::{format_error, format_info, format_score, format_success};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

const SOURCE_PREVIEW_CHARS: usize = 160;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    pub sources: usize,
    pub chunks: usize,
    pub analysis_chars: usize,
    pub answer_chars: usize,
    pub elapsed: Duration,
    pub failed: bool,
}

impl QueryStats {
    pub fn chunks_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.chunks as f64 / secs
    }
}

/// Turns a stream of `QueryEvent`s into terminal output.
///
/// `StreamChunk` events carry the full accumulated buffers; only the part
/// not yet printed is written out.
pub struct ConsoleRenderer {
    spinner: ProgressBar,
    colored: bool,
    shown_analysis: usize,
    shown_answer: usize,
    answer_started: bool,
    stats: QueryStats,
    start_time: Instant,
}

impl ConsoleRenderer {
    pub fn new(colored: bool) -> Self {
        Self::with_spinner(create_spinner(colored), colored)
    }

    /// Renderer without a visible spinner, for non-interactive output.
    pub fn hidden(colored: bool) -> Self {
        Self::with_spinner(ProgressBar::hidden(), colored)
    }

    fn with_spinner(spinner: ProgressBar, colored: bool) -> Self {
        Self {
            spinner,
            colored,
            shown_analysis: 0,
            shown_answer: 0,
            answer_started: false,
            stats: QueryStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn stats(&self) -> QueryStats {
        QueryStats {
            elapsed: self.start_time.elapsed(),
            ..self.stats.clone()
        }
    }

    /// Consumes events until the sender side is dropped.
    pub async fn run(mut self, mut events: UnboundedReceiver<QueryEvent>) -> QueryStats {
        let mut stdout = std::io::stdout();
        while let Some(event) = events.recv().await {
            let output = self.handle(&event);
            if !output.is_empty() {
                self.spinner.suspend(|| {
                    let _ = write!(stdout, "{}", output);
                    let _ = stdout.flush();
                });
            }
        }
        self.spinner.finish_and_clear();
        self.stats()
    }

    /// Updates state for one event and returns the text to print for it.
    pub fn handle(&mut self, event: &QueryEvent) -> String {
        match event {
            QueryEvent::IndexingStarted { documents } => {
                self.spinner
                    .set_message(format!("Indexing {} documents", documents));
                String::new()
            }
            QueryEvent::IndexingComplete { documents, terms } => format!(
                "{}\n",
                format_success(&format!(
                    "Indexed {} documents ({} distinct terms)",
                    documents, terms
                ))
            ),
            QueryEvent::SearchStarted { question } => {
                self.reset_stream();
                self.spinner.set_message("Searching");
                format!("{}\n", format_info(&format!("Question: {}", question)))
            }
            QueryEvent::Processing { message } => {
                self.spinner.set_message(message.clone());
                String::new()
            }
            QueryEvent::SourcesReady { documents } => {
                self.stats.sources = documents.len();
                self.render_sources(documents)
            }
            QueryEvent::StreamChunk {
                pre_tag_text,
                post_tag_text,
            } => {
                self.stats.chunks += 1;
                self.render_chunk(pre_tag_text, post_tag_text)
            }
            QueryEvent::QueryComplete => {
                self.spinner.set_message("Done");
                format!("\n\n{}\n", format_success("Query complete"))
            }
            QueryEvent::Error { kind, message } => {
                self.stats.failed = true;
                format!("\n{}\n", format_error(&format!("[{:?}] {}", kind, message)))
            }
        }
    }

    fn reset_stream(&mut self) {
        self.shown_analysis = 0;
        self.shown_answer = 0;
        self.answer_started = false;
        self.stats.analysis_chars = 0;
        self.stats.answer_chars = 0;
    }

    fn render_sources(&self, documents: &[SourceDocument]) -> String {
        let mut out = format!("\n{}\n", self.heading("Sources"));
        for (rank, source) in documents.iter().enumerate() {
            let title = if source.title.is_empty() {
                source.id.clone()
            } else {
                format!("{} ({})", source.title, source.id)
            };
            out.push_str(&format!(
                "  {}. {} [{}]\n",
                rank + 1,
                title,
                format_score(source.score)
            ));
            if !source.date.is_empty() || !source.folder.is_empty() {
                out.push_str(&format!("     {} {}\n", source.date, source.folder));
            }
            out.push_str(&format!(
                "     {}\n",
                crate::utils::Validator::truncate_text(&source.text, SOURCE_PREVIEW_CHARS)
            ));
        }
        out.push_str(&format!("\n{}\n", self.heading("Analysis")));
        out
    }

    fn render_chunk(&mut self, analysis: &str, answer: &str) -> String {
        let mut out = String::new();

        out.push_str(unseen_suffix(analysis, self.shown_analysis));
        self.shown_analysis = analysis.len();
        self.stats.analysis_chars = analysis.chars().count();

        if !answer.is_empty() {
            if !self.answer_started {
                self.answer_started = true;
                out.push_str(&format!("\n\n{}\n", self.heading("Answer")));
            }
            out.push_str(unseen_suffix(answer, self.shown_answer));
            self.shown_answer = answer.len();
            self.stats.answer_chars = answer.chars().count();
        }

        out
    }

    fn heading(&self, title: &str) -> String {
        if self.colored {
            title.cyan().bold().to_string()
        } else {
            title.to_string()
        }
    }
}

/// Buffers only ever grow by appending, so `shown` is always a char boundary
/// of `text`. Anything else means the stream restarted.
fn unseen_suffix(text: &str, shown: usize) -> &str {
    text.get(shown..).unwrap_or(text)
}

fn create_spinner(colored: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] {msg}"
    } else {
        "{spinner} [{elapsed_precise}] {msg}"
    };
    let style = ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn chunk(pre: &str, post: &str) -> QueryEvent {
        QueryEvent::StreamChunk {
            pre_tag_text: pre.to_string(),
            post_tag_text: post.to_string(),
        }
    }

    #[test]
    fn test_prints_only_new_text() {
        let mut renderer = ConsoleRenderer::hidden(false);

        assert_eq!(renderer.handle(&chunk("Les ", "")), "Les ");
        assert_eq!(renderer.handle(&chunk("Les sources", "")), "sources");
        assert_eq!(
            renderer.handle(&chunk("Les sources", "Oui")),
            "\n\nAnswer\nOui"
        );
        assert_eq!(renderer.handle(&chunk("Les sources", "Oui, décidé")), ", décidé");

        let stats = renderer.stats();
        assert_eq!(stats.chunks, 4);
        assert_eq!(stats.analysis_chars, 11);
        assert_eq!(stats.answer_chars, 11);
    }

    #[test]
    fn test_new_search_resets_stream_offsets() {
        let mut renderer = ConsoleRenderer::hidden(false);
        renderer.handle(&chunk("first run", "done"));

        renderer.handle(&QueryEvent::SearchStarted {
            question: "again".to_string(),
        });
        assert_eq!(renderer.handle(&chunk("second", "")), "second");
    }

    #[test]
    fn test_sources_listing() {
        colored::control::set_override(false);
        let mut renderer = ConsoleRenderer::hidden(false);
        let sources = vec![SourceDocument {
            id: "A-1".to_string(),
            title: "Arrêt".to_string(),
            date: "2020-01-01".to_string(),
            authors: vec![],
            folder: "Dossier".to_string(),
            text: "Le tribunal a statué".to_string(),
            score: 0.5,
        }];

        let out = renderer.handle(&QueryEvent::SourcesReady { documents: sources });
        assert!(out.contains("1. Arrêt (A-1) [50.00%]"));
        assert!(out.contains("Le tribunal a statué"));
        assert!(out.ends_with("Analysis\n"));
        assert_eq!(renderer.stats().sources, 1);
    }

    #[test]
    fn test_error_marks_failure() {
        let mut renderer = ConsoleRenderer::hidden(false);
        let out = renderer.handle(&QueryEvent::Error {
            kind: ErrorKind::Busy,
            message: "A query is already in progress".to_string(),
        });
        assert!(out.contains("already in progress"));
        assert!(renderer.stats().failed);
    }

    #[test]
    fn test_chunks_per_second_zero_elapsed() {
        assert_eq!(QueryStats::default().chunks_per_second(), 0.0);
    }

    #[tokio::test]
    async fn test_run_drains_until_sender_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(chunk("a", "")).unwrap();
        tx.send(chunk("ab", "c")).unwrap();
        tx.send(QueryEvent::QueryComplete).unwrap();
        drop(tx);

        let stats = ConsoleRenderer::hidden(false).run(rx).await;
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.answer_chars, 1);
        assert!(!stats.failed);
    }
}
