// ============================================================
// Layer 2 — BatchUseCase
// ============================================================
// Streams a fixed number of batches through the full pipeline
// and reports their shapes. This is the same path a training
// loop would pull from, minus the model:
//
//   Step 1: Open corpus + vocabulary   (PrepareUseCase)
//   Step 2: Decide max_length          (given, or measured)
//   Step 3: Build the BatchStream      (Layer 4 - data)
//   Step 4: Pull `count` batches

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::prepare_use_case::{max_length_for, CorpusConfig, PrepareUseCase};
use crate::data::{batcher::BatchStream, pairs::max_sequence_length};
use crate::infra::memory::matrix_memory;

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batches:       usize,
    pub passes:        usize,
    pub max_length:    usize,
    pub vocab_size:    usize,
    pub inputs_shape:  Vec<usize>,
    pub targets_shape: Vec<usize>,
    /// Measured size of the last batch's one-hot targets, header included, in GB
    pub targets_gb:    f64,
}

pub struct BatchUseCase {
    config:     CorpusConfig,
    count:      usize,
    max_length: Option<usize>,
}

impl BatchUseCase {
    /// `max_length` of None means "measure the corpus first"
    pub fn new(config: CorpusConfig, count: usize, max_length: Option<usize>) -> Self {
        Self { config, count, max_length }
    }

    pub fn execute(&self) -> Result<BatchSummary> {
        // ── Step 1: corpus and vocabulary ─────────────────────────────────────
        let prepare = PrepareUseCase::new(self.config.clone());
        let reader  = prepare.reader()?;
        let vocab   = prepare.vocabulary(&reader, false)?;

        // ── Step 2: max_length ────────────────────────────────────────────────
        let max_length = match self.max_length {
            Some(len) => len,
            None => {
                let longest = max_sequence_length(&reader, &vocab)
                    .context("Cannot measure the longest sequence")?;
                max_length_for(longest)
            }
        };
        tracing::info!(
            "Streaming {} batches: vocab_size={}, max_length={}, batch_samples={}",
            self.count,
            vocab.vocab_size(),
            max_length,
            self.config.pipeline.batch_samples
        );

        // ── Step 3: stream ────────────────────────────────────────────────────
        let mut stream = BatchStream::new(
            &reader,
            &vocab,
            vocab.vocab_size(),
            max_length,
            self.config.pipeline.clone(),
        )?;
        tracing::info!(
            "One-hot targets take {:.6} GB per batch",
            stream.target_footprint_gb()
        );

        // ── Step 4: pull batches ──────────────────────────────────────────────
        let mut summary = BatchSummary {
            batches:       0,
            passes:        0,
            max_length,
            vocab_size:    vocab.vocab_size(),
            inputs_shape:  Vec::new(),
            targets_shape: Vec::new(),
            targets_gb:    0.0,
        };

        for _ in 0..self.count {
            let batch = match stream.next() {
                Some(batch) => batch.context("Batch stream failed")?,
                None => break,
            };
            summary.batches      += 1;
            summary.inputs_shape  = batch.inputs.shape().to_vec();
            summary.targets_shape = batch.targets.shape().to_vec();

            let measured = matrix_memory(&batch.targets);
            summary.targets_gb = measured.object_gib;
            tracing::info!(
                "Batch {}: X {:?}, y {:?}",
                summary.batches,
                summary.inputs_shape,
                summary.targets_shape
            );
            tracing::debug!(
                "Batch {} targets: {:.9} GB ({:.9} GB of values, {} bytes per item)",
                summary.batches,
                measured.object_gib,
                measured.values_gib,
                measured.item_size
            );
        }
        summary.passes = stream.passes();

        Ok(summary)
    }
}
