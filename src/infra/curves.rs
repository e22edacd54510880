// ============================================================
// Layer 6 — Curve Table (CSV)
// ============================================================
// Stores curve data as a CSV file so a plot can be redrawn
// later without rerunning anything.
//
// Layout: first column is x, every other column is one curve.
//
//   epoch,train_loss,val_loss
//   1,3.124500,3.089200
//   2,2.890100,2.854300
//   ...
//
// CurveLog appends one row at a time, so a long-running job
// can record points as they arrive. read_curves turns the file
// back into Curves ready for plot_figure.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{PipelineError, PipelineResult};
use crate::infra::figure::Curve;

/// Appends rows of (x, y1, y2, ...) to a CSV file.
pub struct CurveLog {
    csv_path: PathBuf,
    columns:  usize,
}

impl CurveLog {
    /// Open (or create) a CSV file with the given column names.
    /// The header is written only when the file is new, so runs
    /// can append to an existing log.
    pub fn new(csv_path: impl Into<PathBuf>, header: &[&str]) -> PipelineResult<Self> {
        let csv_path = csv_path.into();

        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path).map_err(|e| PipelineError::io(&csv_path, e))?;
            writeln!(f, "{}", header.join(",")).map_err(|e| PipelineError::io(&csv_path, e))?;
            tracing::debug!("Created curve CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path, columns: header.len() })
    }

    /// Append one row: x followed by one value per curve
    pub fn append(&self, x: f64, ys: &[f64]) -> PipelineResult<()> {
        if ys.len() + 1 != self.columns {
            return Err(PipelineError::Csv {
                path:   self.csv_path.clone(),
                line:   0,
                reason: format!("expected {} values, got {}", self.columns, ys.len() + 1),
            });
        }

        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| PipelineError::io(&self.csv_path, e))?;

        let row: Vec<String> = std::iter::once(x)
            .chain(ys.iter().copied())
            .map(|v| format!("{v:.6}"))
            .collect();
        writeln!(f, "{}", row.join(",")).map_err(|e| PipelineError::io(&self.csv_path, e))?;
        Ok(())
    }

    /// Return the path to the CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Read a curve CSV: skip the header, x in column 0, one Curve per further column.
pub fn read_curves(path: impl AsRef<Path>) -> PipelineResult<Vec<Curve>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;

    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let columns = match lines.next() {
        Some((_, header)) => header.split(',').count(),
        None => return Ok(Vec::new()),
    };

    let mut xs: Vec<f64>       = Vec::new();
    let mut ys: Vec<Vec<f64>>  = vec![Vec::new(); columns.saturating_sub(1)];

    for (index, line) in lines {
        let values = line
            .split(',')
            .map(|cell| cell.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| PipelineError::Csv {
                path:   path.to_path_buf(),
                line:   index + 1,
                reason: e.to_string(),
            })?;

        if values.len() != columns {
            return Err(PipelineError::Csv {
                path:   path.to_path_buf(),
                line:   index + 1,
                reason: format!("expected {} columns, got {}", columns, values.len()),
            });
        }

        xs.push(values[0]);
        for (series, &value) in ys.iter_mut().zip(&values[1..]) {
            series.push(value);
        }
    }

    Ok(ys.iter().map(|series| Curve::new(&xs, series)).collect())
}
