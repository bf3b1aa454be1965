// file: src/generation/demux.rs
// description: incremental split of a generation stream into analysis and answer buffers
// reference: two-state machine driven by the analysis-end sentinel

use crate::generation::prompt::{ANALYSIS_END, NO_OP_MARKERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    PreSplit,
    PostSplit,
}

/// Current contents of both buffers after a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSnapshot<'a> {
    pub pre_tag: &'a str,
    pub post_tag: &'a str,
}

/// Routes streamed text into `pre_tag` until the analysis-end sentinel is
/// seen, and into `post_tag` afterwards. No-op markers are dropped.
///
/// A trailing fragment that could be the start of a sentinel is held back
/// until the next chunk (or `finish`), so sentinels split across chunks are
/// still recognised. Never blocks; safe to call from a provider callback.
#[derive(Debug)]
pub struct StreamDemultiplexer {
    pre_tag: String,
    post_tag: String,
    state: SplitState,
    pending: String,
}

impl StreamDemultiplexer {
    pub fn new() -> Self {
        Self {
            pre_tag: String::new(),
            post_tag: String::new(),
            state: SplitState::PreSplit,
            pending: String::new(),
        }
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    pub fn pre_tag(&self) -> &str {
        &self.pre_tag
    }

    pub fn post_tag(&self) -> &str {
        &self.post_tag
    }

    pub fn snapshot(&self) -> StreamSnapshot<'_> {
        StreamSnapshot {
            pre_tag: &self.pre_tag,
            post_tag: &self.post_tag,
        }
    }

    pub fn push(&mut self, chunk: &str) -> StreamSnapshot<'_> {
        let mut text = std::mem::take(&mut self.pending);
        text.push_str(chunk);

        if self.state == SplitState::PreSplit {
            if let Some(pos) = text.find(ANALYSIS_END) {
                let (before, rest) = text.split_at(pos);
                self.pre_tag.push_str(&strip_no_op_markers(before));
                self.state = SplitState::PostSplit;
                let after = rest[ANALYSIS_END.len()..].to_string();
                self.append_post_split(&after);
            } else {
                let cut = text.len() - held_back_len(&text, true);
                self.pre_tag.push_str(&strip_no_op_markers(&text[..cut]));
                self.pending = text[cut..].to_string();
            }
        } else {
            self.append_post_split(&text);
        }

        self.snapshot()
    }

    /// Flushes any held-back fragment; call once the stream has ended.
    pub fn finish(&mut self) -> StreamSnapshot<'_> {
        let pending = std::mem::take(&mut self.pending);
        let residue = strip_no_op_markers(&pending);
        match self.state {
            SplitState::PreSplit => self.pre_tag.push_str(&residue),
            SplitState::PostSplit => self.post_tag.push_str(&residue),
        }
        self.snapshot()
    }

    pub fn into_parts(mut self) -> (String, String) {
        self.finish();
        (self.pre_tag, self.post_tag)
    }

    fn append_post_split(&mut self, text: &str) {
        let cut = text.len() - held_back_len(text, false);
        self.post_tag.push_str(&strip_no_op_markers(&text[..cut]));
        self.pending = text[cut..].to_string();
    }
}

impl Default for StreamDemultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_no_op_markers(text: &str) -> String {
    NO_OP_MARKERS
        .iter()
        .fold(text.to_string(), |acc, marker| acc.replace(marker, ""))
}

/// Length of the longest suffix of `text` that is a proper prefix of a
/// sentinel still worth waiting for.
fn held_back_len(text: &str, include_split: bool) -> usize {
    let split = include_split.then_some(ANALYSIS_END);
    let sentinels = NO_OP_MARKERS.iter().copied().chain(split);

    sentinels
        .map(|sentinel| {
            let max = (sentinel.len() - 1).min(text.len());
            (1..=max)
                .rev()
                .find(|&len| {
                    let start = text.len() - len;
                    text.is_char_boundary(start) && sentinel.starts_with(&text[start..])
                })
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(chunks: &[&str]) -> (String, String) {
        let mut demux = StreamDemultiplexer::new();
        for chunk in chunks {
            demux.push(chunk);
        }
        demux.into_parts()
    }

    #[test]
    fn test_split_inside_single_chunk() {
        let (pre, post) = run(&["hello ", "world<|source_analysis_end|>answer text"]);
        assert_eq!(pre, "hello world");
        assert_eq!(post, "answer text");
    }

    #[test]
    fn test_no_op_markers_stripped_after_split() {
        let (pre, post) = run(&[
            "analysis<|source_analysis_end|>",
            "<|answer_start|>foo<|answer_end|>",
        ]);
        assert_eq!(pre, "analysis");
        assert_eq!(post, "foo");
    }

    #[test]
    fn test_empty_stream() {
        let (pre, post) = run(&[]);
        assert_eq!(pre, "");
        assert_eq!(post, "");
    }

    #[test]
    fn test_no_op_markers_stripped_before_split() {
        let (pre, post) = run(&["a<|end_of_text|>b", "c"]);
        assert_eq!(pre, "abc");
        assert_eq!(post, "");
    }

    #[test]
    fn test_sentinel_straddling_chunks() {
        let (pre, post) = run(&["thinking<|source_anal", "ysis_end|>", "reply"]);
        assert_eq!(pre, "thinking");
        assert_eq!(post, "reply");
    }

    #[test]
    fn test_no_op_marker_straddling_chunks() {
        let (_, post) = run(&["<|source_analysis_end|><|answer", "_start|>yes<|answer_", "end|>"]);
        assert_eq!(post, "yes");
    }

    #[test]
    fn test_snapshot_after_each_chunk() {
        let mut demux = StreamDemultiplexer::new();

        let snap = demux.push("first ");
        assert_eq!(snap.pre_tag, "first ");
        assert_eq!(snap.post_tag, "");

        let snap = demux.push("half<|source_analysis_end|>second");
        assert_eq!(snap.pre_tag, "first half");
        assert_eq!(snap.post_tag, "second");
        assert_eq!(demux.state(), SplitState::PostSplit);
    }

    #[test]
    fn test_partial_marker_held_until_resolved() {
        let mut demux = StreamDemultiplexer::new();

        assert_eq!(demux.push("a <|").pre_tag, "a ");
        // turns out not to be a sentinel
        assert_eq!(demux.push("x|> b").pre_tag, "a <|x|> b");
    }

    #[test]
    fn test_finish_flushes_unresolved_fragment() {
        let mut demux = StreamDemultiplexer::new();
        demux.push("tail <|source");
        assert_eq!(demux.finish().pre_tag, "tail <|source");
    }

    #[test]
    fn test_split_marker_after_split_is_plain_text() {
        let (pre, post) = run(&["a<|source_analysis_end|>b<|source_analysis_end|>c"]);
        assert_eq!(pre, "a");
        assert_eq!(post, "b<|source_analysis_end|>c");
    }

    #[test]
    fn test_multibyte_text_is_not_split_mid_char() {
        let (pre, post) = run(&["réponse é", "<|source_analysis_end|>données"]);
        assert_eq!(pre, "réponse é");
        assert_eq!(post, "données");
    }

    #[test]
    fn test_many_chunks() {
        let mut demux = StreamDemultiplexer::new();
        for _ in 0..1000 {
            demux.push("x");
        }
        demux.push("<|source_analysis_end|>");
        for _ in 0..500 {
            demux.push("y");
        }
        let (pre, post) = demux.into_parts();
        assert_eq!(pre.len(), 1000);
        assert_eq!(post.len(), 500);
    }
}
