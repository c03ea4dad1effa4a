use std::path::Path as FsPath;

use image::{Rgba, RgbaImage};

use crate::{Color, PaintStyle, Point, Polyline, Result, Scene, WobblyEffect};

/// Maximum flattened segment length in pixels.
const FLATTEN_DETAIL: f64 = 0.35;

/// Renders scenes into RGBA pixel buffers ("canvas" output).
#[derive(Debug, Clone, Copy)]
pub struct RasterExport {
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

impl RasterExport {
    pub fn new(width: u32, height: u32) -> Self {
        RasterExport {
            width,
            height,
            background: Color::WHITE,
        }
    }

    /// Rasterize the scene. With an active `effect`, paths are densified
    /// and displaced with exactly the vertices the SVG backend emits.
    pub fn render(&self, scene: &Scene, effect: Option<&WobblyEffect>) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(
            self.width,
            self.height,
            Rgba([self.background.r, self.background.g, self.background.b, self.background.a]),
        );

        for op in &scene.ops {
            let path = match effect {
                Some(effect) if effect.is_active() => effect.apply(&op.shape.path),
                _ => op.shape.path.clone(),
            };
            let polylines = path.flatten(FLATTEN_DETAIL);
            match op.shape.style {
                PaintStyle::Fill => {
                    fill_polygons(&mut image, &polylines, op.color, op.opacity);
                }
                PaintStyle::Stroke { width } => {
                    for poly in &polylines {
                        stroke_polyline(&mut image, poly, width, op.color, op.opacity);
                    }
                }
            }
        }
        image
    }

    /// Render and write a PNG in one step.
    pub fn write_png(&self, scene: &Scene, effect: Option<&WobblyEffect>, path: &FsPath) -> Result<()> {
        let image = self.render(scene, effect);
        image.save(path)?;
        Ok(())
    }
}

/// Even-odd scanline fill over all subpaths at once, so ring sectors with
/// an inner contour leave their hole empty.
fn fill_polygons(image: &mut RgbaImage, polylines: &[Polyline], color: Color, opacity: f64) {
    let height = image.height();
    let width = image.width();
    for y in 0..height {
        let scan_y = f64::from(y) + 0.5;
        let mut crossings: Vec<f64> = Vec::new();
        for poly in polylines {
            let pts = &poly.points;
            if pts.len() < 2 {
                continue;
            }
            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                if (a.y > scan_y) != (b.y > scan_y) {
                    crossings.push(a.x + (scan_y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil().max(0.0) as u32;
            let x1 = (span[1] - 0.5).floor().min(f64::from(width) - 1.0);
            if x1 < 0.0 {
                continue;
            }
            for x in x0..=x1 as u32 {
                blend(image, x, y, color, opacity);
            }
        }
    }
}

/// Stroke a flattened polyline: every segment becomes a filled quad of the
/// pen width (butt caps).
fn stroke_polyline(image: &mut RgbaImage, poly: &Polyline, width: f64, color: Color, opacity: f64) {
    if width <= 0.0 || poly.points.len() < 2 {
        return;
    }
    let half = width / 2.0;
    let mut segments: Vec<(Point, Point)> = poly.points.windows(2).map(|seg| (seg[0], seg[1])).collect();
    if poly.closed {
        segments.push((poly.points[poly.points.len() - 1], poly.points[0]));
    }
    for (a, b) in segments {
        let dir = b - a;
        let len = dir.length();
        if len <= 0.0 {
            continue;
        }
        let normal = Point::new(-dir.y / len * half, dir.x / len * half);
        let quad = Polyline {
            points: vec![a + normal, b + normal, b - normal, a - normal],
            closed: true,
        };
        fill_polygons(image, std::slice::from_ref(&quad), color, opacity);
    }
}

fn blend(image: &mut RgbaImage, x: u32, y: u32, color: Color, opacity: f64) {
    let alpha = (f64::from(color.a) / 255.0 * opacity).clamp(0.0, 1.0);
    let pixel = image.get_pixel_mut(x, y);
    for (channel, src) in [color.r, color.g, color.b].into_iter().enumerate() {
        let dst = f64::from(pixel.0[channel]);
        pixel.0[channel] = (f64::from(src) * alpha + dst * (1.0 - alpha)).round() as u8;
    }
    let dst_a = f64::from(pixel.0[3]) / 255.0;
    pixel.0[3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round() as u8;
}
