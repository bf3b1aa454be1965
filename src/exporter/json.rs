// file: src/exporter/json.rs
// description: json export of answered queries

use crate::error::Result;
use crate::models::Answer;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct AnswerExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedAnswer {
    pub exported_at: String,
    #[serde(flatten)]
    pub answer: Answer,
}

impl AnswerExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `answer` to `<output_dir>/<query_id>.json` and returns the path.
    pub fn export(&self, answer: &Answer, pretty: bool) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.json", answer.query_id));
        let exported = ExportedAnswer {
            exported_at: Utc::now().to_rfc3339(),
            answer: answer.clone(),
        };

        let mut writer = BufWriter::new(File::create(&path)?);
        if pretty {
            serde_json::to_writer_pretty(&mut writer, &exported)?;
        } else {
            serde_json::to_writer(&mut writer, &exported)?;
        }
        writer.flush()?;

        info!(
            "Exported answer {} ({} sources) to {}",
            answer.query_id,
            answer.sources.len(),
            path.display()
        );
        Ok(path)
    }
}
