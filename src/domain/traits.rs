// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The batch stream needs to restart the corpus every time it
// runs dry. Instead of re-entering a hidden generator, it holds
// a DocumentSource and asks it for a fresh pass. The caller
// decides what a pass costs and in which order documents come:
//
//   - CorpusReader   → re-scans and re-reads a directory
//   - Vec<Document>  → replays documents already in memory
//
// Encoding is abstracted the same way so the pair generator
// does not care whether token indices come from the fitted
// word-level tokenizer or a hand-built table.

use crate::domain::document::Document;
use crate::error::{PipelineError, PipelineResult};

/// One lazy pass over a corpus.
/// An Err item ends the pass; callers must not pull after it.
pub type DocumentIter<'a> = Box<dyn Iterator<Item = PipelineResult<Document>> + 'a>;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// A restartable provider of documents.
pub trait DocumentSource {
    /// Start a new pass over the documents.
    /// Fails up front if the pass cannot even begin (e.g. missing directory).
    fn documents(&self) -> PipelineResult<DocumentIter<'_>>;
}

impl DocumentSource for [Document] {
    fn documents(&self) -> PipelineResult<DocumentIter<'_>> {
        Ok(Box::new(self.iter().cloned().map(Ok::<_, PipelineError>)))
    }
}

impl DocumentSource for Vec<Document> {
    fn documents(&self) -> PipelineResult<DocumentIter<'_>> {
        self.as_slice().documents()
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn documents(&self) -> PipelineResult<DocumentIter<'_>> {
        (**self).documents()
    }
}

// ─── TokenEncoder ─────────────────────────────────────────────────────────────
/// Turns text into token indices.
///
/// Words missing from the vocabulary are dropped, never mapped
/// to a placeholder, so the returned sequence may be shorter
/// than the word count.
pub trait TokenEncoder {
    /// Encode one segment of text
    fn encode(&self, text: &str) -> PipelineResult<Vec<u32>>;
}

impl<T: TokenEncoder + ?Sized> TokenEncoder for &T {
    fn encode(&self, text: &str) -> PipelineResult<Vec<u32>> {
        (**self).encode(text)
    }
}
