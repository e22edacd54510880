// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns that sit next to the pipeline rather than inside it:
//
//   tokenizer_store.rs — Vocabulary persistence
//                        Fits the word-level tokenizer over the
//                        corpus if none exists, or loads the saved
//                        one, so every run uses the same indices.
//
//   memory.rs          — Memory estimation
//                        Projects the size of a matrix from its
//                        shape; the batcher's guard is built on it.
//
//   figure.rs          — Curve plotting
//                        Writes up to four curves to a PNG.
//
//   curves.rs          — Curve CSV files
//                        Records and reloads the data that
//                        figure.rs draws.

/// Tokenizer fitting, saving, and loading
pub mod tokenizer_store;

/// Matrix memory estimation
pub mod memory;

/// PNG curve plots
pub mod figure;

/// Curve CSV logging and reading
pub mod curves;
