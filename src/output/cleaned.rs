//! Cleaned corpus files: JSONL and a human-readable text dump

use crate::output::traits::{create_output_file, CorpusSink};
use crate::state::CrawlDocument;
use crate::{CorpusError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Separator line between records of the text dump
pub const RECORD_SEPARATOR_WIDTH: usize = 100;

/// Writes one compact JSON object per line
#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSink for JsonlWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&self, records: &[CrawlDocument]) -> Result<PathBuf> {
        let mut writer = create_output_file(&self.path)?;
        for record in records {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line).map_err(|e| CorpusError::storage(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| CorpusError::storage(&self.path, e))?;
        Ok(self.path.clone())
    }
}

/// Writes numbered records for reading by eye
///
/// ```text
/// [Document 1] https://example.com/
/// page text
///
/// ====...====
///
/// ```
#[derive(Debug, Clone)]
pub struct TextDumpWriter {
    path: PathBuf,
}

impl TextDumpWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSink for TextDumpWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&self, records: &[CrawlDocument]) -> Result<PathBuf> {
        let mut writer = create_output_file(&self.path)?;
        for (i, record) in records.iter().enumerate() {
            writer
                .write_all(format_text_record(i + 1, record).as_bytes())
                .map_err(|e| CorpusError::storage(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| CorpusError::storage(&self.path, e))?;
        Ok(self.path.clone())
    }
}

/// Formats one text dump record; `number` starts at 1
pub fn format_text_record(number: usize, record: &CrawlDocument) -> String {
    format!(
        "[Document {}] {}\n{}\n\n{}\n\n",
        number,
        record.url,
        record.text,
        "=".repeat(RECORD_SEPARATOR_WIDTH)
    )
}
