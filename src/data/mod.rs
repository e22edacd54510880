// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a corpus directory to training batches.
//
// The pipeline flows in this order:
//
//   corpus directory
//       │
//       ▼
//   scan_files        → non-directory entries, filesystem order
//       │
//       ▼
//   CorpusReader      → one Document per file, decoded lazily
//       │
//       ├──────────────► Vocabulary::fit   (once, over a full pass)
//       ▼
//   split_segments    → text between newline runs
//       │
//       ▼
//   InputOutputPairs  → every prefix of every encoded segment
//       │
//       ▼
//   BatchStream       → padded inputs + one-hot targets, forever
//
// Each module is responsible for exactly one step, and every
// step is a plain iterator, so the whole pipeline is pull-based:
// nothing is read until the consumer asks for the next batch.

/// Lists files in the corpus directory
pub mod scanner;

/// Reads and decodes corpus files into Documents
pub mod loader;

/// Splits documents at newline runs
pub mod segmenter;

/// Word-level vocabulary and encoder
pub mod vocabulary;

/// Generates input-output pairs from documents
pub mod pairs;

/// Padding and one-hot encoding
pub mod encoding;

/// Assembles pairs into fixed-size batches
pub mod batcher;
