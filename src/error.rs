// ============================================================
// Pipeline Error Type
// ============================================================
// Every fallible step of the corpus-to-batch pipeline returns
// a PipelineError. The application and CLI layers wrap these
// in anyhow with extra context; library callers can match on
// the variant (e.g. shrink the batch on ResourceBudgetExceeded).

use std::path::PathBuf;

/// Errors produced by the scanner, loader, vocabulary, batcher and plotter.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Directory listing or file read failed
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File bytes are malformed under the configured encoding
    #[error("'{}' is not valid {encoding} text", .path.display())]
    Decode { path: PathBuf, encoding: String },

    /// The configured encoding label is not a known WHATWG label
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    /// Building, loading or running the tokenizer failed
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// The one-hot target matrix would exceed the configured ceiling
    #[error("one-hot targets need {required_gb:.4} GB, above the {limit_gb} GB limit")]
    ResourceBudgetExceeded { required_gb: f64, limit_gb: f64 },

    /// A class index does not fit in the requested number of classes
    #[error("class index {index} out of range for {num_classes} classes")]
    ClassOutOfRange { index: u32, num_classes: usize },

    /// Configuration values that cannot produce a batch
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A whole pass over the corpus did not fill a single batch
    #[error("a full corpus pass produced {pairs} pairs, fewer than one batch of {batch_samples}")]
    CorpusTooSmall { pairs: usize, batch_samples: usize },

    /// A curve file could not be parsed
    #[error("malformed CSV '{}' line {line}: {reason}", .path.display())]
    Csv { path: PathBuf, line: usize, reason: String },

    /// Rendering or encoding a figure failed
    #[error("plot error: {0}")]
    Plot(String),

    /// Reading or writing a JSON file failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Result alias used across the library
pub type PipelineResult<T> = Result<T, PipelineError>;
