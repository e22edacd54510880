// ============================================================
// Layer 4 — Corpus Reader
// ============================================================
// Turns a corpus directory into a lazy stream of Documents.
//
// Every call to documents() starts a fresh pass:
//   1. scan the directory (new files are picked up)
//   2. for each file, when it is pulled:
//        read all bytes  → file handle closed again
//        decode bytes    → with the configured encoding
//        yield Document
//
// Only one file is open at any moment, and nothing is read
// ahead of the consumer.
//
// Encodings:
//   Corpora are not always UTF-8 (news dumps are often GBK),
//   so the encoding is a WHATWG label resolved by encoding_rs.
//   Malformed bytes are an error, never silently replaced —
//   a replaced character would become a bogus vocabulary word.

use encoding_rs::Encoding;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::PipelineConfig;
use crate::data::scanner::scan_files;
use crate::domain::{Document, DocumentIter, DocumentSource};
use crate::error::{PipelineError, PipelineResult};

/// Reads every file directly under a directory as one Document.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    /// Directory holding the corpus files
    dir: PathBuf,
    /// Text encoding shared by every file
    encoding: &'static Encoding,
}

impl CorpusReader {
    /// Create a reader for `dir` decoding with the given encoding label.
    /// Unknown labels are rejected here rather than on the first file.
    pub fn new(dir: impl Into<PathBuf>, encoding_label: &str) -> PipelineResult<Self> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
            .ok_or_else(|| PipelineError::UnknownEncoding(encoding_label.to_string()))?;
        Ok(Self { dir: dir.into(), encoding })
    }

    /// Create a reader using the encoding from a PipelineConfig
    pub fn from_config(dir: impl Into<PathBuf>, config: &PipelineConfig) -> PipelineResult<Self> {
        Self::new(dir, &config.encoding)
    }

    /// The corpus directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical name of the configured encoding, e.g. "UTF-8" or "GBK"
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl DocumentSource for CorpusReader {
    fn documents(&self) -> PipelineResult<DocumentIter<'_>> {
        let files    = scan_files(&self.dir)?;
        let encoding = self.encoding;
        tracing::debug!(
            "Starting corpus pass over {} files in '{}'",
            files.len(),
            self.dir.display()
        );
        Ok(Box::new(
            files.into_iter().map(move |path| read_document(&path, encoding)),
        ))
    }
}

/// fs::read opens, reads and closes the file before decoding starts,
/// on the error path as well.
fn read_document(path: &Path, encoding: &'static Encoding) -> PipelineResult<Document> {
    let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .ok_or_else(|| PipelineError::Decode {
            path:     path.to_path_buf(),
            encoding: encoding.name().to_string(),
        })?
        .into_owned();

    tracing::trace!("Loaded: {} ({} chars)", path.display(), text.len());
    Ok(Document::new(path, text))
}
