// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// One corpus file's full text, read in a single piece.
// The pipeline never mutates it; a Document lives for one
// pass of the pair generator and is then dropped.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A raw document loaded from the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The file path — kept for traceability in logs and errors
    pub source: PathBuf,

    /// The full decoded text content of the file
    pub text: String,
}

impl Document {
    /// Create a new Document with a source path and text content.
    ///
    /// Example:
    ///   let doc = Document::new("corpus/news_01.txt", "a b\n\nc d e");
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }
}
