// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags:
//
//   vocab    — fit (or load) the vocabulary and save it
//   stats    — print corpus statistics as JSON
//   batches  — stream batches and report their shapes
//   plot     — draw curves from a CSV file
//
// Every corpus command shares CorpusArgs. An optional --config
// JSON file supplies the pipeline settings; individual flags
// override it.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use corpus_batcher::application::prepare_use_case::CorpusConfig;
use corpus_batcher::config::{PipelineConfig, RemainderPolicy};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the vocabulary over the corpus and save it
    Vocab(VocabArgs),

    /// Print corpus statistics under the saved vocabulary
    Stats(CorpusArgs),

    /// Stream batches through the pipeline and report their shapes
    Batches(BatchArgs),

    /// Draw the curves stored in a CSV file into a PNG
    Plot(PlotArgs),
}

/// Where the corpus lives and how to read it
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory of plain-text corpus files (not recursive)
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory holding tokenizer.json
    #[arg(long, default_value = "artifacts")]
    pub store_dir: String,

    /// JSON file with pipeline settings
    #[arg(long)]
    pub config: Option<String>,

    /// Text encoding of the corpus files, e.g. utf-8 or gbk
    #[arg(long)]
    pub encoding: Option<String>,
}

/// Read --config (or use defaults) and apply the flag overrides
impl TryFrom<CorpusArgs> for CorpusConfig {
    type Error = anyhow::Error;

    fn try_from(a: CorpusArgs) -> Result<Self> {
        let mut pipeline = match &a.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Cannot load config '{path}'"))?,
            None => PipelineConfig::default(),
        };
        if let Some(encoding) = a.encoding {
            pipeline.encoding = encoding;
        }

        Ok(CorpusConfig {
            corpus_dir: a.corpus_dir,
            store_dir:  a.store_dir,
            pipeline,
        })
    }
}

#[derive(Args, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Fit again even if a tokenizer is already saved
    #[arg(long)]
    pub refit: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Number of batches to pull; may span several corpus passes
    #[arg(long, default_value_t = 3)]
    pub count: usize,

    /// Pairs per batch (overrides the config file)
    #[arg(long)]
    pub batch_samples: Option<usize>,

    /// Ceiling in GB for one batch's one-hot targets (overrides the config file)
    #[arg(long)]
    pub memory_threshold_gb: Option<f64>,

    /// Padded length; measured from the corpus when omitted
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Carry leftover pairs into the next pass instead of dropping them
    #[arg(long)]
    pub carry_remainder: bool,
}

impl TryFrom<BatchArgs> for CorpusConfig {
    type Error = anyhow::Error;

    fn try_from(a: BatchArgs) -> Result<Self> {
        let mut config = CorpusConfig::try_from(a.corpus)?;
        if let Some(n) = a.batch_samples {
            config.pipeline.batch_samples = n;
        }
        if let Some(gb) = a.memory_threshold_gb {
            config.pipeline.y_memory_threshold_gb = gb;
        }
        if a.carry_remainder {
            config.pipeline.remainder = RemainderPolicy::Carry;
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    /// CSV file: header row, first column x, one column per curve
    #[arg(long)]
    pub csv: String,

    /// Name used in log messages
    #[arg(long, default_value = "loss")]
    pub name: String,

    /// Directory where the PNG is written
    #[arg(long, default_value = "figures")]
    pub figures_dir: String,
}
