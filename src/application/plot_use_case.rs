// ============================================================
// Layer 2 — PlotUseCase
// ============================================================
// Loads curves from a CSV file and draws them into a figure.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::infra::{curves::read_curves, figure::plot_figure};

/// Draw every curve in `csv_path`. Returns the image path, or
/// None if the file held more curves than a figure can show.
pub fn plot_csv(
    csv_path:    impl AsRef<Path>,
    figure_name: &str,
    figures_dir: impl AsRef<Path>,
) -> Result<Option<PathBuf>> {
    let csv_path = csv_path.as_ref();
    let curves   = read_curves(csv_path)
        .with_context(|| format!("Cannot read curves from '{}'", csv_path.display()))?;
    tracing::info!("Loaded {} curves from '{}'", curves.len(), csv_path.display());

    plot_figure(figures_dir, figure_name, &curves).context("Cannot draw figure")
}
