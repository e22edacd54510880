// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Everything that has to happen once before batches can flow:
//
//   Step 1: Open the corpus           (Layer 4 - data)
//   Step 2: Fit or load vocabulary    (Layer 6 - infra)
//   Step 3: Measure the corpus        (Layer 4 - data)
//   Step 4: Derive max_length and the per-batch memory cost
//
// max_length:
//   The batcher pads every pair to max_length - 1 tokens, and
//   the longest pair is as long as the longest encoded segment.
//   So max_length = longest segment + 1 keeps every pair whole.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::data::{
    batcher::MIN_MAX_LENGTH,
    loader::CorpusReader,
    pairs::{corpus_stats, CorpusStats},
    vocabulary::Vocabulary,
};
use crate::infra::{memory::projected_gib, tokenizer_store::TokenizerStore};

// ─── Corpus Configuration ─────────────────────────────────────────────────────
// Where the corpus and the saved vocabulary live, plus the
// pipeline settings. Serialisable so a run can be recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub corpus_dir: String,
    pub store_dir:  String,
    pub pipeline:   PipelineConfig,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            corpus_dir: "data/corpus".to_string(),
            store_dir:  "artifacts".to_string(),
            pipeline:   PipelineConfig::default(),
        }
    }
}

/// Summary of a corpus under a fitted vocabulary
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub stats:       CorpusStats,
    pub vocab_size:  usize,
    pub max_length:  usize,
    /// One-hot target size of one batch, in GB
    pub target_gb:   f64,
    /// Full batches one pass yields (leftovers dropped)
    pub batches_per_pass: usize,
}

/// max_length that pads without truncating any pair
pub fn max_length_for(longest_sequence: usize) -> usize {
    (longest_sequence + 1).max(MIN_MAX_LENGTH)
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: CorpusConfig,
}

impl PrepareUseCase {
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    /// Open the corpus directory with the configured encoding
    pub fn reader(&self) -> Result<CorpusReader> {
        let reader = CorpusReader::from_config(&self.config.corpus_dir, &self.config.pipeline)
            .with_context(|| format!("Cannot open corpus '{}'", self.config.corpus_dir))?;
        tracing::info!(
            "Reading corpus '{}' as {}",
            reader.dir().display(),
            reader.encoding_name()
        );
        Ok(reader)
    }

    /// Load the stored vocabulary, or fit one. `refit` ignores any stored file.
    pub fn vocabulary(&self, reader: &CorpusReader, refit: bool) -> Result<Vocabulary> {
        let store = TokenizerStore::new(&self.config.store_dir);
        let vocab = if refit {
            store.fit_and_save(reader)
        } else {
            store.load_or_fit(reader)
        };
        vocab.with_context(|| {
            format!(
                "Cannot prepare vocabulary for '{}' in '{}'",
                self.config.corpus_dir, self.config.store_dir
            )
        })
    }

    /// Measure the corpus and derive batching parameters
    pub fn report(&self, reader: &CorpusReader, vocab: &Vocabulary) -> Result<CorpusReport> {
        tracing::info!("Measuring corpus in '{}'", self.config.corpus_dir);
        let stats = corpus_stats(reader, vocab)
            .with_context(|| format!("Cannot read corpus '{}'", self.config.corpus_dir))?;

        let batch_samples = self.config.pipeline.batch_samples;
        Ok(CorpusReport {
            stats,
            vocab_size:       vocab.vocab_size(),
            max_length:       max_length_for(stats.max_sequence_length),
            target_gb:        projected_gib(
                &[batch_samples, vocab.num_classes()],
                std::mem::size_of::<f64>(),
            ),
            batches_per_pass: stats.pairs / batch_samples.max(1),
        })
    }
}
