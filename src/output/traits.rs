//! Corpus sink trait
//!
//! Every corpus file this crate produces holds the same `{url, text}` records
//! in order; sinks differ only in the file format.

use crate::state::CrawlDocument;
use crate::{CorpusError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Trait for corpus writers
///
/// Implementations replace the file at their path and create missing parent
/// directories. Writing an empty slice produces a valid, empty file.
pub trait CorpusSink {
    /// The file this sink writes to
    fn path(&self) -> &Path;

    /// Writes all records, in order, and returns the path written
    ///
    /// # Arguments
    ///
    /// * `records` - The records to write
    fn write_records(&self, records: &[CrawlDocument]) -> Result<PathBuf>;
}

/// Opens `path` for writing, creating parent directories first
pub(crate) fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CorpusError::storage(parent, e))?;
    }

    let file = File::create(path).map_err(|e| CorpusError::storage(path, e))?;
    Ok(BufWriter::new(file))
}

/// Classifies an error from streaming JSON into a file
///
/// I/O failures surface as `Storage` on `path`; anything else is a
/// serialization error.
pub(crate) fn json_write_error(path: &Path, e: serde_json::Error) -> CorpusError {
    if e.is_io() {
        CorpusError::storage(path, e.into())
    } else {
        CorpusError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_failure_while_serializing_is_storage_error() {
        let records = vec![CrawlDocument::new("https://example.com/", "text")];
        let e = serde_json::to_writer_pretty(FullDisk, &records).unwrap_err();

        let err = json_write_error(Path::new("out/corpus.json"), e);
        match err {
            CorpusError::Storage { path, source } => {
                assert_eq!(path, Path::new("out/corpus.json"));
                assert_eq!(source.kind(), io::ErrorKind::Other);
            }
            other => panic!("expected a storage error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_output_file_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("out.json");

        let mut writer = create_output_file(&path).unwrap();
        writer.write_all(b"[]").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
