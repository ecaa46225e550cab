//! Raw corpus file: a pretty-printed JSON array of `{url, text}` records

use crate::output::traits::{create_output_file, json_write_error, CorpusSink};
use crate::state::CrawlDocument;
use crate::{ConfigError, CorpusError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the crawl's documents as the raw corpus
///
/// The file is a JSON array indented with two spaces. Non-ASCII text is
/// written as UTF-8, not escaped.
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    path: PathBuf,
}

impl CorpusWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes the documents and returns the path of the file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_corpus::{CorpusWriter, CrawlDocument};
    ///
    /// let writer = CorpusWriter::new("data/raw/corpus.json");
    /// let path = writer.write(&[CrawlDocument::new("https://example.com/", "Hello")]).unwrap();
    /// println!("Saved corpus to {}", path.display());
    /// ```
    pub fn write(&self, documents: &[CrawlDocument]) -> Result<PathBuf> {
        let mut writer = create_output_file(&self.path)?;
        serde_json::to_writer_pretty(&mut writer, documents)
            .map_err(|e| json_write_error(&self.path, e))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| CorpusError::storage(&self.path, e))?;

        tracing::info!(
            "Saved {} documents to {}",
            documents.len(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}

impl CorpusSink for CorpusWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&self, records: &[CrawlDocument]) -> Result<PathBuf> {
        self.write(records)
    }
}

/// Reads a raw corpus file written by [`CorpusWriter`]
///
/// # Returns
///
/// * `Ok(Vec<CrawlDocument>)` - The records, in file order
/// * `Err(CorpusError::Config(ConfigError::MissingCorpus))` - The file does not exist
/// * `Err(CorpusError::CorpusFormat)` - The file is not a JSON array of records
pub fn read_raw_corpus(path: &Path) -> Result<Vec<CrawlDocument>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingCorpus(path.to_path_buf()).into());
        }
        Err(e) => return Err(CorpusError::storage(path, e)),
    };

    serde_json::from_str(&content).map_err(|source| CorpusError::CorpusFormat {
        path: path.to_path_buf(),
        source,
    })
}
