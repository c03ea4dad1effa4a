//! Module geometry generation.

use serde::{Deserialize, Serialize};

mod module_drawer;
pub use module_drawer::*;

/// Whether a module's nominal stroke is drawn as one solid band or as
/// several thinner parallel sub-strokes with gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeMode {
    #[default]
    Solid,
    Stripes,
}

/// Whether modules are emitted as filled outlines or as stroked
/// centerlines. Both produce the same visual band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMethod {
    #[default]
    Fill,
    Stroke,
}

/// Per-render configuration. Plain data, owned by the caller; every field
/// can change independently between render calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub mode: StrokeMode,
    /// Number of sub-strokes in stripes mode.
    pub strokes_num: u32,
    /// Width of a sub-stroke relative to the gap between sub-strokes.
    pub stroke_gap_ratio: f64,
    /// Corner rounding for plain bars in fill method, in cell units.
    pub corner_radius: f64,
    pub render_method: RenderMethod,
    /// Nominal stroke thickness as a fraction of the cell size. The drawn
    /// band is half this wide.
    pub stem: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: StrokeMode::Solid,
            strokes_num: 3,
            stroke_gap_ratio: 2.0,
            corner_radius: 0.0,
            render_method: RenderMethod::Fill,
            stem: 0.5,
        }
    }
}

/// Split a band `[start, start + total]` into `n` sub-bands.
///
/// `gap = total / (n * (ratio + 1) - 1)` and each sub-band is `gap * ratio`
/// wide, so sub-band widths plus gaps always sum back to `total`.
/// Degenerate inputs (no strokes, non-positive total or ratio) yield no
/// slots instead of negative-width geometry.
pub fn stripe_slots(start: f64, total: f64, n: u32, ratio: f64) -> Vec<(f64, f64)> {
    if n == 0 || total <= 0.0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(start, total)];
    }
    if ratio <= 0.0 {
        return Vec::new();
    }
    let gap = total / (f64::from(n) * (ratio + 1.0) - 1.0);
    let width = gap * ratio;
    (0..n).map(|i| (start + f64::from(i) * (width + gap), width)).collect()
}
