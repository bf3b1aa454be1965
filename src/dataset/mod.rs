// file: src/dataset/mod.rs
// description: dataset module exports
// reference: corpus loading from local files or http(s) urls

mod loader;

pub use loader::{DatasetLoader, parse_documents};
