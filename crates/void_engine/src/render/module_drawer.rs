//! Pure geometry for the seven module kinds.
//!
//! All geometry is produced in a cell-local frame: origin at the cell
//! center, y pointing down, cell side `cell`. The rotation is applied as
//! exact quarter turns before the shapes are returned; callers translate
//! the result to the cell's position on the surface.
//!
//! Two invariants hold for every kind:
//! - fill and stroke method cover the same band, so their centroids match;
//! - in stripes mode, sub-stroke widths plus gaps sum to the solid band
//!   width, and compound shapes nest as non-crossing ladders.

use std::f64::consts::FRAC_PI_2;

use crate::{Module, ModuleKind, Path, Point, Shape};

use super::{stripe_slots, RenderMethod, RenderOptions, StrokeMode};

/// Build the shapes for one module in its cell-local frame.
///
/// Degenerate parameters (zero stem, zero stripes, radii that vanish after
/// subtracting the band width) skip the affected sub-shapes; this function
/// never fails.
pub fn draw_module(module: Module, cell: f64, opts: &RenderOptions) -> Vec<Shape> {
    let band = (opts.stem * cell / 2.0).min(cell);
    if module.kind.is_empty() || band <= 0.0 || cell <= 0.0 {
        return Vec::new();
    }

    let ctx = DrawContext {
        half: cell / 2.0,
        cell,
        band,
        opts: *opts,
    };

    let shapes = match module.kind {
        ModuleKind::Empty => Vec::new(),
        ModuleKind::Straight => ctx.bar(-ctx.half),
        ModuleKind::Central => ctx.bar(-band / 2.0),
        ModuleKind::Joint => ctx.joint(),
        ModuleKind::Link => ctx.link(),
        ModuleKind::Round => ctx.turn(cell - band),
        ModuleKind::Bend => ctx.turn(0.0),
    };

    let quarter_turns = module.rotation.quarter_turns();
    if quarter_turns == 0 {
        shapes
    } else {
        shapes
            .into_iter()
            .map(|shape| Shape {
                path: shape.path.rotate_quarter(quarter_turns),
                style: shape.style,
            })
            .collect()
    }
}

struct DrawContext {
    half: f64,
    cell: f64,
    band: f64,
    opts: RenderOptions,
}

impl DrawContext {
    fn slots(&self, start: f64) -> Vec<(f64, f64)> {
        match self.opts.mode {
            StrokeMode::Solid => vec![(start, self.band)],
            StrokeMode::Stripes => stripe_slots(start, self.band, self.opts.strokes_num, self.opts.stroke_gap_ratio),
        }
    }

    fn is_fill(&self) -> bool {
        self.opts.render_method == RenderMethod::Fill
    }

    /// A full-height vertical bar whose band starts at `x0`.
    fn bar(&self, x0: f64) -> Vec<Shape> {
        let mut shapes = Vec::new();
        for (sx, sw) in self.slots(x0) {
            shapes.push(self.vertical(sx, sw, -self.half, self.half));
        }
        shapes
    }

    /// "⊢": left bar plus a centered horizontal bar to the right edge.
    ///
    /// Ladder pairing: the i-th vertical sub-stripe (left to right) carries
    /// the i-th horizontal sub-stripe (top to bottom), which starts at its
    /// partner's right edge, so no two stripes cross at the junction.
    fn joint(&self) -> Vec<Shape> {
        let vertical = self.slots(-self.half);
        let horizontal = self.slots(-self.band / 2.0);

        let mut shapes = Vec::new();
        for ((vx, vw), (hy, hw)) in vertical.into_iter().zip(horizontal) {
            shapes.push(self.vertical(vx, vw, -self.half, self.half));
            let x_start = vx + vw;
            if x_start < self.half {
                shapes.push(self.horizontal(hy, hw, x_start, self.half));
            }
        }
        shapes
    }

    /// "L": left bar meeting the bottom bar at the shared corner.
    ///
    /// Ladder pairing: the i-th vertical sub-stripe (left to right) turns
    /// into the i-th horizontal sub-stripe counted from the bottom up, so
    /// the outermost L is the left- and bottom-most one and the stripes
    /// nest without crossing.
    fn link(&self) -> Vec<Shape> {
        let vertical = self.slots(-self.half);
        let horizontal = self.slots(self.half - self.band);

        let mut shapes = Vec::new();
        for ((vx, vw), (hy, hw)) in vertical.into_iter().zip(horizontal.into_iter().rev()) {
            // Vertical leg runs from the top edge down to the bottom edge
            // of its horizontal partner.
            shapes.push(self.vertical(vx, vw, -self.half, hy + hw));
            let x_start = vx + vw;
            if x_start < self.half {
                shapes.push(self.horizontal(hy, hw, x_start, self.half));
            }
        }
        shapes
    }

    /// Quarter turn: ring sectors centered at the bottom-left cell corner,
    /// sweeping from "up" (the top band on the left side) to "right" (the
    /// right-edge band at the bottom). `inner` is the innermost radius of
    /// the whole band.
    fn turn(&self, inner: f64) -> Vec<Shape> {
        let center = Point::new(-self.half, self.half);
        let mut shapes = Vec::new();
        for (r0, sw) in self.slots(inner) {
            let r_in = r0.max(0.0);
            let r_out = r0 + sw;
            if r_out <= 0.0 || r_out - r_in <= 0.0 {
                continue;
            }
            if self.is_fill() {
                shapes.push(Shape::filled(ring_sector(center, r_in, r_out, -FRAC_PI_2, 0.0)));
            } else {
                let rc = (r_in + r_out) / 2.0;
                if rc > 0.0 {
                    let mut path = Path::new();
                    path.arc(center, rc, -FRAC_PI_2, 0.0);
                    shapes.push(Shape::stroked(path, r_out - r_in));
                }
            }
        }
        shapes
    }

    /// One vertical band slot spanning `[y0, y1]`.
    fn vertical(&self, x0: f64, width: f64, y0: f64, y1: f64) -> Shape {
        if self.is_fill() {
            Shape::filled(rounded_rect(x0, y0, x0 + width, y1, self.corner_radius_for(width, y1 - y0)))
        } else {
            let mut path = Path::new();
            path.move_to(x0 + width / 2.0, y0).line_to(x0 + width / 2.0, y1);
            Shape::stroked(path, width)
        }
    }

    /// One horizontal band slot spanning `[x0, x1]`.
    fn horizontal(&self, y0: f64, width: f64, x0: f64, x1: f64) -> Shape {
        if self.is_fill() {
            Shape::filled(rounded_rect(x0, y0, x1, y0 + width, self.corner_radius_for(width, x1 - x0)))
        } else {
            let mut path = Path::new();
            path.move_to(x0, y0 + width / 2.0).line_to(x1, y0 + width / 2.0);
            Shape::stroked(path, width)
        }
    }

    fn corner_radius_for(&self, width: f64, length: f64) -> f64 {
        (self.opts.corner_radius * self.cell).min(width / 2.0).min(length / 2.0).max(0.0)
    }
}

/// Axis-aligned rectangle with optionally rounded corners, clockwise.
fn rounded_rect(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) -> Path {
    let mut path = Path::new();
    if radius <= 0.0 {
        path.move_to(x0, y0).line_to(x1, y0).line_to(x1, y1).line_to(x0, y1).close();
        return path;
    }
    let r = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0);
    path.move_to(x0 + r, y0);
    path.arc(Point::new(x1 - r, y0 + r), r, -FRAC_PI_2, 0.0);
    path.arc(Point::new(x1 - r, y1 - r), r, 0.0, FRAC_PI_2);
    path.arc(Point::new(x0 + r, y1 - r), r, FRAC_PI_2, 2.0 * FRAC_PI_2);
    path.arc(Point::new(x0 + r, y0 + r), r, 2.0 * FRAC_PI_2, 3.0 * FRAC_PI_2);
    path.close();
    path
}

/// Ring sector (quarter annulus) as a single closed path: outer arc out,
/// inner arc back. Collapses to a pie slice when `r_in` is 0.
fn ring_sector(center: Point, r_in: f64, r_out: f64, start_angle: f64, end_angle: f64) -> Path {
    let mut path = Path::new();
    path.arc(center, r_out, start_angle, end_angle);
    if r_in > 0.0 {
        path.arc(center, r_in, end_angle, start_angle);
    } else {
        path.line_to(center.x, center.y);
    }
    path.close();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PaintStyle, Polyline, Rotation};

    const CELL: f64 = 100.0;
    const DETAIL: f64 = 0.25;

    fn module(kind: ModuleKind, rotation: u8) -> Module {
        Module::new(kind, Rotation::new(rotation))
    }

    /// Area-weighted centroid of a closed polygon (shoelace).
    fn polygon_centroid(poly: &Polyline) -> (f64, Point) {
        let pts = &poly.points;
        let mut area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            let cross = a.x * b.y - b.x * a.y;
            area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        area /= 2.0;
        (area.abs(), Point::new(cx / (6.0 * area), cy / (6.0 * area)))
    }

    /// Outline polygon of a butt-capped stroke along an open polyline:
    /// the centerline offset by half the pen width along the vertex
    /// normals, out on one side and back along the other.
    fn stroke_outline(poly: &Polyline, width: f64) -> Polyline {
        let pts = &poly.points;
        let half = width / 2.0;
        let unit = |v: Point| {
            let len = v.length();
            Point::new(v.x / len, v.y / len)
        };
        let mut left = Vec::with_capacity(pts.len());
        let mut right = Vec::with_capacity(pts.len());
        for i in 0..pts.len() {
            let dir = match (i.checked_sub(1), pts.get(i + 1)) {
                (Some(prev), Some(next)) => {
                    let a = unit(pts[i] - pts[prev]);
                    let b = unit(*next - pts[i]);
                    unit(a + b)
                }
                (Some(prev), None) => unit(pts[i] - pts[prev]),
                (None, Some(next)) => unit(*next - pts[i]),
                (None, None) => continue,
            };
            let normal = Point::new(-dir.y * half, dir.x * half);
            left.push(pts[i] + normal);
            right.push(pts[i] - normal);
        }
        right.reverse();
        left.extend(right);
        Polyline { points: left, closed: true }
    }

    /// Coverage centroid of a list of shapes: polygon centroid for fills,
    /// band outline polygons for strokes (so an arc's mass grows with its
    /// radius, as the painted annulus does).
    fn coverage_centroid(shapes: &[Shape]) -> Point {
        let mut total = 0.0;
        let mut acc = Point::default();
        for shape in shapes {
            for poly in shape.path.flatten(DETAIL) {
                let (area, c) = match shape.style {
                    PaintStyle::Fill => polygon_centroid(&poly),
                    PaintStyle::Stroke { width } => polygon_centroid(&stroke_outline(&poly, width)),
                };
                total += area;
                acc.x += c.x * area;
                acc.y += c.y * area;
            }
        }
        assert!(total > 0.0, "no coverage");
        Point::new(acc.x / total, acc.y / total)
    }

    fn options(method: RenderMethod, mode: StrokeMode) -> RenderOptions {
        RenderOptions {
            render_method: method,
            mode,
            strokes_num: 3,
            stroke_gap_ratio: 2.0,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_empty_draws_nothing() {
        let shapes = draw_module(module(ModuleKind::Empty, 0), CELL, &RenderOptions::default());
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_fill_stroke_centroid_equivalence() {
        for kind in [
            ModuleKind::Straight,
            ModuleKind::Central,
            ModuleKind::Joint,
            ModuleKind::Link,
            ModuleKind::Round,
            ModuleKind::Bend,
        ] {
            for mode in [StrokeMode::Solid, StrokeMode::Stripes] {
                let fill = draw_module(module(kind, 0), CELL, &options(RenderMethod::Fill, mode));
                let stroke = draw_module(module(kind, 0), CELL, &options(RenderMethod::Stroke, mode));
                let cf = coverage_centroid(&fill);
                let cs = coverage_centroid(&stroke);
                assert!(
                    cf.distance(cs) < 0.05,
                    "{kind} {mode:?}: fill centroid {cf} vs stroke centroid {cs}"
                );
            }
        }
    }

    #[test]
    fn test_straight_band_position() {
        let opts = RenderOptions::default();
        let shapes = draw_module(module(ModuleKind::Straight, 0), CELL, &opts);
        assert_eq!(shapes.len(), 1);
        // stem 0.5 on a 100 cell: band 25 wide at the left edge.
        let c = coverage_centroid(&shapes);
        assert!((c.x - (-50.0 + 12.5)).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_straight_rotations_move_band() {
        let opts = RenderOptions::default();
        // Rotation 1: band along the top edge.
        let c = coverage_centroid(&draw_module(module(ModuleKind::Straight, 1), CELL, &opts));
        assert!(c.x.abs() < 1e-6);
        assert!((c.y - (-50.0 + 12.5)).abs() < 1e-6);
        // Rotation 2: band along the right edge.
        let c = coverage_centroid(&draw_module(module(ModuleKind::Straight, 2), CELL, &opts));
        assert!((c.x - (50.0 - 12.5)).abs() < 1e-6);
    }

    #[test]
    fn test_central_is_centered() {
        let c = coverage_centroid(&draw_module(module(ModuleKind::Central, 0), CELL, &RenderOptions::default()));
        assert!(c.x.abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_stripes_emit_expected_shape_counts() {
        let opts = options(RenderMethod::Fill, StrokeMode::Stripes);
        assert_eq!(draw_module(module(ModuleKind::Straight, 0), CELL, &opts).len(), 3);
        // Joint and Link: one vertical and one horizontal piece per stripe.
        assert_eq!(draw_module(module(ModuleKind::Joint, 0), CELL, &opts).len(), 6);
        assert_eq!(draw_module(module(ModuleKind::Link, 0), CELL, &opts).len(), 6);
        assert_eq!(draw_module(module(ModuleKind::Round, 0), CELL, &opts).len(), 3);
    }

    #[test]
    fn test_joint_stripes_do_not_overlap() {
        let opts = options(RenderMethod::Fill, StrokeMode::Stripes);
        let shapes = draw_module(module(ModuleKind::Joint, 0), CELL, &opts);
        // Horizontal pieces are the odd entries; none may reach left of its
        // partner vertical stripe's right edge and their y slots are
        // disjoint.
        let mut y_ranges: Vec<(f64, f64)> = Vec::new();
        for pair in shapes.chunks(2) {
            let v = bounds(&pair[0]);
            let h = bounds(&pair[1]);
            assert!(h.0 .x >= v.1.x - 1e-9, "horizontal starts inside vertical stripe");
            for range in &y_ranges {
                assert!(h.1.y <= range.0 + 1e-9 || h.0.y >= range.1 - 1e-9, "overlapping y slots");
            }
            y_ranges.push((h.0.y, h.1.y));
        }
    }

    #[test]
    fn test_link_stripes_nest() {
        let opts = options(RenderMethod::Fill, StrokeMode::Stripes);
        let shapes = draw_module(module(ModuleKind::Link, 0), CELL, &opts);
        // Outermost L: leftmost vertical paired with the bottommost
        // horizontal; successive Ls sit strictly inside.
        let mut prev_corner: Option<Point> = None;
        for pair in shapes.chunks(2) {
            let v = bounds(&pair[0]);
            let h = bounds(&pair[1]);
            let corner = Point::new(v.0.x, h.1.y);
            if let Some(prev) = prev_corner {
                assert!(corner.x > prev.x, "vertical legs must move right");
                assert!(corner.y < prev.y, "horizontal legs must move up");
            }
            prev_corner = Some(corner);
        }
    }

    #[test]
    fn test_degenerate_inputs_skip_shapes() {
        let opts = RenderOptions {
            stem: 0.0,
            ..RenderOptions::default()
        };
        assert!(draw_module(module(ModuleKind::Straight, 0), CELL, &opts).is_empty());

        let opts = RenderOptions {
            strokes_num: 0,
            ..options(RenderMethod::Fill, StrokeMode::Stripes)
        };
        assert!(draw_module(module(ModuleKind::Round, 0), CELL, &opts).is_empty());

        // Oversized stem: Round's inner radius collapses to a pie instead
        // of going negative.
        let opts = RenderOptions {
            stem: 3.0,
            ..RenderOptions::default()
        };
        let shapes = draw_module(module(ModuleKind::Round, 0), CELL, &opts);
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_round_connects_edges() {
        // The wide turn starts in the top band at the left edge and ends in
        // the right-edge band at the bottom.
        let shapes = draw_module(module(ModuleKind::Round, 0), CELL, &RenderOptions::default());
        let (min, max) = bounds(&shapes[0]);
        assert!((min.x - (-50.0)).abs() < 1e-6);
        assert!((min.y - (-50.0)).abs() < 1e-6);
        assert!((max.x - 50.0).abs() < 1e-6);
        assert!((max.y - 50.0).abs() < 1e-6);
    }

    fn bounds(shape: &Shape) -> (Point, Point) {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for poly in shape.path.flatten(DETAIL) {
            for p in poly.points {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        }
        (min, max)
    }
}
