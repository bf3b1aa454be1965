// file: src/generation/mod.rs
// description: prompt construction and streamed output demultiplexing
// reference: internal module structure

pub mod demux;
pub mod prompt;

pub use demux::{SplitState, StreamDemultiplexer, StreamSnapshot};
pub use prompt::build_prompt;
