// ============================================================
// Pipeline Configuration
// ============================================================
// Every knob of the corpus-to-batch pipeline lives in one
// struct that is handed to each stage when it is built.
// Nothing is read from module-level state.
//
// The struct is serde-serialisable so a run can be described
// by a JSON file and reproduced later:
//
//   {
//     "batch_samples": 128,
//     "y_memory_threshold_gb": 2.0,
//     "encoding": "utf-8",
//     "remainder": "drop",
//     "figures_dir": "figures"
//   }

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::{PipelineError, PipelineResult};

/// What happens to pairs left in the buffer when a corpus pass ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Discard them; every pass starts with an empty buffer
    Drop,
    /// Keep them and fill the batch from the next pass
    Carry,
}

/// Configuration shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Exact number of input-output pairs per batch
    pub batch_samples: usize,

    /// Ceiling (in GB) for the one-hot target matrix of one batch
    pub y_memory_threshold_gb: f64,

    /// WHATWG label of the corpus text encoding, e.g. "utf-8" or "gbk"
    pub encoding: String,


    /// Leftover pairs policy at the end of each corpus pass
    pub remainder: RemainderPolicy,

    /// Directory where figures are written
    pub figures_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_samples:         128,
            y_memory_threshold_gb: 2.0,
            encoding:              "utf-8".to_string(),
            remainder:             RemainderPolicy::Drop,
            figures_dir:           "figures".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file.
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PipelineError::io(path, e))?;
        tracing::debug!("Saved pipeline config to '{}'", path.display());
        Ok(())
    }

    /// Reject values that can never produce a batch
    pub fn validate(&self) -> PipelineResult<()> {
        if self.batch_samples == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_samples must be at least 1".to_string(),
            ));
        }
        if !(self.y_memory_threshold_gb > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "y_memory_threshold_gb must be positive, got {}",
                self.y_memory_threshold_gb
            )));
        }
        Ok(())
    }
}
