use std::fmt::Write as _;

use crate::{Color, PaintStyle, Scene, WobblyEffect};

/// Renders scenes to standalone SVG documents.
#[derive(Debug, Clone, Copy)]
pub struct SvgExport {
    pub width: f64,
    pub height: f64,
    /// Optional page background; `None` keeps the document transparent.
    pub background: Option<Color>,
}

impl SvgExport {
    pub fn new(width: f64, height: f64) -> Self {
        SvgExport {
            width,
            height,
            background: None,
        }
    }

    /// Emit one `<path>` per draw op. When `effect` is active every path
    /// is densified and displaced first, so the path data matches the
    /// raster backend vertex for vertex.
    pub fn render(&self, scene: &Scene, effect: Option<&WobblyEffect>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );
        if let Some(background) = self.background {
            let _ = writeln!(
                out,
                "  <rect width=\"{w}\" height=\"{h}\" fill=\"{fill}\"/>",
                w = self.width,
                h = self.height,
                fill = hex_color(background)
            );
        }

        for op in &scene.ops {
            let data = match effect {
                Some(effect) if effect.is_active() => effect.apply(&op.shape.path).to_svg_data(),
                _ => op.shape.path.to_svg_data(),
            };
            if data.is_empty() {
                continue;
            }
            let color = hex_color(op.color);
            match op.shape.style {
                PaintStyle::Fill => {
                    let _ = write!(out, "  <path d=\"{data}\" fill=\"{color}\" fill-rule=\"evenodd\"");
                    if op.opacity < 1.0 {
                        let _ = write!(out, " fill-opacity=\"{}\"", op.opacity);
                    }
                }
                PaintStyle::Stroke { width } => {
                    let _ = write!(
                        out,
                        "  <path d=\"{data}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width}\" stroke-linecap=\"butt\""
                    );
                    if op.opacity < 1.0 {
                        let _ = write!(out, " stroke-opacity=\"{}\"", op.opacity);
                    }
                }
            }
            let _ = writeln!(out, "/>");
        }
        out.push_str("</svg>\n");
        out
    }
}

fn hex_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}
