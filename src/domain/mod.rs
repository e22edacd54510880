// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the pipeline
// works on:
//
//   Document         — one corpus file's full text
//   InputOutputPair  — a prefix of token indices plus the next one
//   DocumentSource   — anything that can start a pass over documents
//   TokenEncoder     — anything that turns text into token indices
//
// Rules for this layer:
//   - NO file I/O
//   - NO matrix types
//   - Only plain structs, enums, and traits
//
// The data layer implements these traits; the batcher only
// ever sees the traits, so tests and embedding callers can
// inject their own sources and encoders.

// A loaded document from disk
pub mod document;

// A (prefix, next token) training example
pub mod pair;

// Core abstractions (traits) that other layers implement
pub mod traits;

pub use document::Document;
pub use pair::InputOutputPair;
pub use traits::{DocumentIter, DocumentSource, TokenEncoder};
