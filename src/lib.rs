//! Corpus-to-batch pipeline for word-level next-word language models.
//!
//! A directory of text files is read document by document, split
//! into segments at blank lines, encoded with a fitted word
//! vocabulary and expanded into every growing prefix of each
//! segment. Those input-output pairs are padded and one-hot
//! encoded into fixed-size batches, with a memory ceiling on the
//! target matrix. The stream cycles over the corpus indefinitely.
//!
//! ```text
//! CorpusReader → InputOutputPairs → BatchStream → Batch { inputs, targets }
//!                      ↑
//!                  Vocabulary
//! ```

pub mod application;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;

pub use config::{PipelineConfig, RemainderPolicy};
pub use data::{
    batcher::{assemble_batch, Batch, BatchStream},
    loader::CorpusReader,
    pairs::{corpus_stats, max_sequence_length, CorpusStats, InputOutputPairs},
    vocabulary::Vocabulary,
};
pub use domain::{Document, DocumentSource, InputOutputPair, TokenEncoder};
pub use error::{PipelineError, PipelineResult};
