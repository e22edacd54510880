// ============================================================
// Layer 4 — Batch Stream
// ============================================================
// Turns the pair generator into an endless stream of fixed
// size (inputs, one-hot targets) batches for training.
//
// How a batch is built:
//   1. buffer exactly batch_samples pairs
//   2. check the one-hot target footprint against the limit
//        rows × (vocab_size + 1) × 8 bytes
//      and refuse before allocating if it is too large
//   3. pad / truncate every pair on the left to max_length - 1,
//      filling with the reserved index 0 so padding never
//      looks like a word
//   4. split: all columns but the last → input row
//             last column             → target index
//   5. one-hot the targets over vocab_size + 1 classes
//
// Example (batch_samples = 3, max_length = 4, vocab_size = 7):
//   pairs   [1,2]    [3,4]    [3,4,5]
//   padded  [0,1,2]  [0,3,4]  [3,4,5]
//   inputs  [0,1]    [0,3]    [3,4]
//   targets one_hot(2), one_hot(4), one_hot(5)   width 8
//
// Cycling:
//   When a pass over the corpus ends, a new pass is requested
//   from the DocumentSource, so the stream never runs dry.
//   Pairs left in the buffer at the end of a pass are dropped
//   (RemainderPolicy::Drop) or kept for the next pass
//   (RemainderPolicy::Carry). A batch is never partial.
//
// Errors end the stream: the caller sees the error once and
// then None. A pass that yields no batch at all is reported as
// CorpusTooSmall instead of looping forever.

use ndarray::{s, Array2};

use crate::config::{PipelineConfig, RemainderPolicy};
use crate::data::encoding::{pad_sequences, to_categorical, PadSide};
use crate::data::pairs::InputOutputPairs;
use crate::data::vocabulary::PAD_ID;
use crate::domain::{DocumentSource, InputOutputPair, TokenEncoder};
use crate::error::{PipelineError, PipelineResult};
use crate::infra::memory::projected_gib;

/// Smallest max_length that leaves one input column next to the target
pub const MIN_MAX_LENGTH: usize = 3;

// ─── Batch ────────────────────────────────────────────────────────────────────
/// One training batch. Row i of `inputs` and row i of `targets`
/// come from the same input-output pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Left-padded prefixes — shape: [batch_samples, max_length - 2]
    pub inputs: Array2<u32>,

    /// One-hot next words — shape: [batch_samples, vocab_size + 1]
    pub targets: Array2<f64>,
}

impl Batch {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    /// True for a batch without rows
    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    /// Target index of every row, recovered from the one-hot matrix
    pub fn target_indices(&self) -> Vec<usize> {
        self.targets
            .rows()
            .into_iter()
            .map(|row| row.iter().position(|&v| v == 1.0).unwrap_or(0))
            .collect()
    }
}

// ─── Materialisation ──────────────────────────────────────────────────────────
/// Materialise buffered pairs into a Batch.
///
/// Fails with ResourceBudgetExceeded, before any matrix is
/// allocated, when the one-hot targets would be larger than
/// `config.y_memory_threshold_gb`.
pub fn assemble_batch(
    pairs:      &[InputOutputPair],
    vocab_size: usize,
    max_length: usize,
    config:     &PipelineConfig,
) -> PipelineResult<Batch> {
    if max_length < MIN_MAX_LENGTH {
        return Err(PipelineError::InvalidConfig(format!(
            "max_length must be at least {MIN_MAX_LENGTH}, got {max_length}"
        )));
    }

    // ── Memory guard ──────────────────────────────────────────────────────────
    let num_classes = vocab_size + 1;
    let required_gb = projected_gib(&[pairs.len(), num_classes], std::mem::size_of::<f64>());
    if required_gb > config.y_memory_threshold_gb {
        tracing::warn!(
            "One-hot targets would take {:.4} GB, limit is {} GB",
            required_gb,
            config.y_memory_threshold_gb
        );
        return Err(PipelineError::ResourceBudgetExceeded {
            required_gb,
            limit_gb: config.y_memory_threshold_gb,
        });
    }

    // ── Pad, then split off the target column ─────────────────────────────────
    let width  = max_length - 1;
    let padded = pad_sequences(pairs, width, PadSide::Pre, PadSide::Pre, PAD_ID);

    let inputs      = padded.slice(s![.., ..width - 1]).to_owned();
    let raw_targets = padded.column(width - 1).to_vec();
    let targets     = to_categorical(&raw_targets, num_classes)?;

    Ok(Batch { inputs, targets })
}

// ─── BatchStream ──────────────────────────────────────────────────────────────
/// Endless, restartable stream of batches over a DocumentSource.
///
/// The source is borrowed, not owned: each pass calls
/// `source.documents()` again, so the caller controls what a
/// pass costs and in which order documents arrive.
pub struct BatchStream<'a, S: ?Sized, E> {
    source:     &'a S,
    encoder:    E,
    config:     PipelineConfig,
    vocab_size: usize,
    max_length: usize,

    /// Pair generator of the running pass
    pairs:  Option<InputOutputPairs<'a, E>>,
    /// Pairs waiting for the batch to fill
    buffer: Vec<InputOutputPair>,

    passes:          usize,
    pairs_in_pass:   usize,
    batches_in_pass: usize,
    batches_total:   usize,
    finished:        bool,
}

impl<'a, S, E> BatchStream<'a, S, E>
where
    S: DocumentSource + ?Sized,
    E: TokenEncoder + Clone,
{
    /// Create a stream. No file is touched until the first batch is pulled.
    pub fn new(
        source:     &'a S,
        encoder:    E,
        vocab_size: usize,
        max_length: usize,
        config:     PipelineConfig,
    ) -> PipelineResult<Self> {
        config.validate()?;
        if max_length < MIN_MAX_LENGTH {
            return Err(PipelineError::InvalidConfig(format!(
                "max_length must be at least {MIN_MAX_LENGTH}, got {max_length}"
            )));
        }

        Ok(Self {
            source,
            encoder,
            buffer: Vec::with_capacity(config.batch_samples),
            config,
            vocab_size,
            max_length,
            pairs: None,
            passes: 0,
            pairs_in_pass: 0,
            batches_in_pass: 0,
            batches_total: 0,
            finished: false,
        })
    }

    /// Number of corpus passes started so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Number of batches yielded so far
    pub fn batches_yielded(&self) -> usize {
        self.batches_total
    }

    /// Projected size in GB of one batch's one-hot targets
    pub fn target_footprint_gb(&self) -> f64 {
        projected_gib(
            &[self.config.batch_samples, self.vocab_size + 1],
            std::mem::size_of::<f64>(),
        )
    }

    fn fail(&mut self, error: PipelineError) -> Option<PipelineResult<Batch>> {
        self.finished = true;
        self.pairs    = None;
        self.buffer.clear();
        Some(Err(error))
    }

    /// Close the running pass. Returns an error if the pass was useless.
    fn end_pass(&mut self) -> PipelineResult<()> {
        self.pairs = None;
        tracing::info!(
            "Corpus pass {} done: {} pairs, {} batches",
            self.passes,
            self.pairs_in_pass,
            self.batches_in_pass
        );

        let stalled = match self.config.remainder {
            RemainderPolicy::Drop  => self.batches_in_pass == 0,
            RemainderPolicy::Carry => self.pairs_in_pass == 0,
        };
        if stalled {
            return Err(PipelineError::CorpusTooSmall {
                pairs:         self.pairs_in_pass,
                batch_samples: self.config.batch_samples,
            });
        }

        if self.config.remainder == RemainderPolicy::Drop && !self.buffer.is_empty() {
            tracing::debug!("Dropping {} leftover pairs", self.buffer.len());
            self.buffer.clear();
        }
        Ok(())
    }
}

impl<S, E> Iterator for BatchStream<'_, S, E>
where
    S: DocumentSource + ?Sized,
    E: TokenEncoder + Clone,
{
    type Item = PipelineResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            // ── Start a new pass when needed ──────────────────────────────────
            if self.pairs.is_none() {
                match InputOutputPairs::new(self.source, self.encoder.clone()) {
                    Ok(pairs) => {
                        self.pairs = Some(pairs);
                        self.passes += 1;
                        self.pairs_in_pass = 0;
                        self.batches_in_pass = 0;
                        tracing::debug!("Starting corpus pass {}", self.passes);
                    }
                    Err(e) => return self.fail(e),
                }
            }

            let next = self.pairs.as_mut().and_then(Iterator::next);
            match next {
                Some(Ok(pair)) => {
                    self.pairs_in_pass += 1;
                    self.buffer.push(pair);

                    if self.buffer.len() == self.config.batch_samples {
                        let pairs = std::mem::replace(
                            &mut self.buffer,
                            Vec::with_capacity(self.config.batch_samples),
                        );
                        return match assemble_batch(
                            &pairs,
                            self.vocab_size,
                            self.max_length,
                            &self.config,
                        ) {
                            Ok(batch) => {
                                self.batches_in_pass += 1;
                                self.batches_total += 1;
                                tracing::debug!(
                                    "Batch {}: inputs {:?}, targets {:?}",
                                    self.batches_total,
                                    batch.inputs.shape(),
                                    batch.targets.shape()
                                );
                                Some(Ok(batch))
                            }
                            Err(e) => self.fail(e),
                        };
                    }
                }
                Some(Err(e)) => return self.fail(e),
                None => {
                    if let Err(e) = self.end_pass() {
                        return self.fail(e);
                    }
                }
            }
        }
    }
}
