// ============================================================
// Layer 6 — Figure Writer
// ============================================================
// Renders up to four (x, y) curves into a PNG, e.g. training
// and validation loss against epoch.
//
//   curve 1 → red,    solid
//   curve 2 → blue,   dashed
//   curve 3 → green,  dash-dot
//   curve 4 → yellow, dotted
//
// Output: <figures_dir>/lm_<YYYY-mm-dd HH_MM_SS>.png
//
// Passing more than four curves is not an error: a warning is
// logged and nothing is drawn. The image is only written, never
// shown, so the call is safe in headless jobs.
//
// Dash patterns are cut in normalised plot space (both axes
// scaled to [0, 1]) so they look the same whatever the data
// ranges are.

use plotters::prelude::*;
use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use crate::error::{PipelineError, PipelineResult};

/// Most curves a single figure can hold
pub const MAX_CURVES: usize = 4;

/// Output image size in pixels
pub const FIGURE_SIZE: (u32, u32) = (1024, 768);

const LINE_WIDTH: u32 = 3;

const PALETTE: [RGBColor; MAX_CURVES] = [RED, BLUE, GREEN, YELLOW];

const STYLES: [LineStyle; MAX_CURVES] = [
    LineStyle::Solid,
    LineStyle::Dashed,
    LineStyle::DashDot,
    LineStyle::Dotted,
];

/// One series of points
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    /// Pair up x and y values; extra values on the longer side are ignored
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        Self {
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        }
    }
}

/// Stroke pattern of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineStyle {
    /// Alternating on/off lengths in normalised plot units; empty means solid
    fn pattern(self) -> &'static [f64] {
        match self {
            LineStyle::Solid   => &[],
            LineStyle::Dashed  => &[0.04, 0.02],
            LineStyle::DashDot => &[0.04, 0.015, 0.006, 0.015],
            LineStyle::Dotted  => &[0.006, 0.012],
        }
    }
}

/// Draw `curves` into a timestamped PNG under `figures_dir`.
///
/// Returns the written path, or None when there were too many
/// curves to draw.
pub fn plot_figure(
    figures_dir: impl AsRef<Path>,
    figure_name: &str,
    curves:      &[Curve],
) -> PipelineResult<Option<PathBuf>> {
    if curves.len() > MAX_CURVES {
        tracing::warn!(
            "Figure '{}' has {} curves, more than {}; nothing drawn",
            figure_name,
            curves.len(),
            MAX_CURVES
        );
        return Ok(None);
    }

    let dir = figures_dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

    let stamp = chrono::Local::now().format("%Y-%m-%d %H_%M_%S");
    let path  = dir.join(format!("lm_{stamp}.png"));

    render(&path, curves).map_err(|e| PipelineError::Plot(e.to_string()))?;

    tracing::info!("Figure '{}' saved to '{}'", figure_name, path.display());
    Ok(Some(path))
}

fn render(path: &Path, curves: &[Curve]) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = bounds(curves);
    let x_span = x_range.end - x_range.start;
    let y_span = y_range.end - y_range.start;

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(24)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    // ── Frame ─────────────────────────────────────────────────────────────────
    let frame = vec![
        (x_range.start, y_range.start),
        (x_range.end, y_range.start),
        (x_range.end, y_range.end),
        (x_range.start, y_range.end),
        (x_range.start, y_range.start),
    ];
    chart.draw_series(std::iter::once(PathElement::new(frame, BLACK.stroke_width(1))))?;

    // ── Curves ────────────────────────────────────────────────────────────────
    for (i, curve) in curves.iter().enumerate() {
        let style    = PALETTE[i].stroke_width(LINE_WIDTH);
        let segments = dash_segments(&curve.points, STYLES[i].pattern(), x_span, y_span);
        chart.draw_series(
            segments
                .into_iter()
                .map(move |segment| PathElement::new(segment, style)),
        )?;
    }

    root.present()?;
    Ok(())
}

/// Data ranges covering every point, widened when degenerate
fn bounds(curves: &[Curve]) -> (Range<f64>, Range<f64>) {
    let points = curves.iter().flat_map(|c| c.points.iter());

    let (mut x_min, mut x_max, mut y_min, mut y_max) =
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points.filter(|(x, y)| x.is_finite() && y.is_finite()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    (widen(x_min, x_max), widen(y_min, y_max))
}

fn widen(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Cut a polyline into the "on" pieces of a dash pattern.
///
/// Lengths are measured after scaling x by `x_span` and y by
/// `y_span`. An empty pattern returns the polyline unchanged.
fn dash_segments(
    points:  &[(f64, f64)],
    pattern: &[f64],
    x_span:  f64,
    y_span:  f64,
) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if pattern.is_empty() {
        return vec![points.to_vec()];
    }

    let mut segments = Vec::new();
    let mut current  = vec![points[0]];
    let mut phase    = 0usize;
    let mut left     = pattern[0];

    for edge in points.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        let dx  = (b.0 - a.0) / x_span;
        let dy  = (b.1 - a.1) / y_span;
        let len = (dx * dx + dy * dy).sqrt();

        let mut walked = 0.0;
        while len - walked > left {
            walked += left;
            let t = walked / len;
            let p = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);

            if phase % 2 == 0 {
                current.push(p);
                segments.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            phase = (phase + 1) % pattern.len();
            left  = pattern[phase];
        }
        left -= len - walked;

        if phase % 2 == 0 {
            current.push(b);
        }
    }

    if phase % 2 == 0 && current.len() >= 2 {
        segments.push(current);
    }
    segments
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Curve {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 0.5).collect();
        Curve::new(&x, &y)
    }

    #[test]
    fn test_too_many_curves_draws_nothing() {
        let dir    = tempfile::tempdir().unwrap();
        let curves = vec![line(3); 5];
        assert_eq!(plot_figure(dir.path(), "loss", &curves).unwrap(), None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writes_png_into_new_directory() {
        let dir     = tempfile::tempdir().unwrap();
        let figures = dir.path().join("figures");
        let curves  = vec![line(10), line(5), line(8), line(2)];

        let path = plot_figure(&figures, "loss", &curves).unwrap().unwrap();
        assert!(path.starts_with(&figures));
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("lm_"));

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_solid_pattern_keeps_polyline() {
        let pts = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(dash_segments(&pts, &[], 2.0, 1.0), vec![pts.clone()]);
    }

    #[test]
    fn test_dashes_alternate_on_and_off() {
        // One unit long horizontal line, dash 0.25 on / 0.25 off
        let pts      = vec![(0.0, 0.0), (1.0, 0.0)];
        let segments = dash_segments(&pts, &[0.25, 0.25], 1.0, 1.0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(0.0, 0.0), (0.25, 0.0)]);
        assert_eq!(segments[1], vec![(0.5, 0.0), (0.75, 0.0)]);
    }

    #[test]
    fn test_single_point_has_no_segments() {
        assert!(dash_segments(&[(1.0, 1.0)], &[0.1, 0.1], 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_degenerate_bounds_are_widened() {
        let (x, y) = bounds(&[Curve::new(&[2.0], &[3.0])]);
        assert_eq!(x, 1.5..2.5);
        assert_eq!(y, 2.5..3.5);
        assert_eq!(bounds(&[]), (0.0..1.0, 0.0..1.0));
    }
}
