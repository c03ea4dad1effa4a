use crate::Point;

/// One path command.
///
/// Arcs are circle sectors parameterized by center/radius/angles. With the
/// y axis pointing down, an increasing angle sweeps clockwise on screen;
/// angle 0 points right, `PI/2` points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Close,
}

/// An explicit path description: the unit of geometry handed to the export
/// backends and to the wobbly effect.
///
/// Keeping paths as plain data (instead of issuing drawing calls directly)
/// lets the wobbly effect re-sample and displace them before anything is
/// stroked, and lets SVG and raster output share identical vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCmd>,
}

/// A flattened subpath: straight segments only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCmd::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCmd::LineTo(Point::new(x, y)));
        self
    }

    /// Append a circular arc. If the subpath already has a current point,
    /// a connecting line to the arc start is implied (canvas semantics).
    pub fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) -> &mut Self {
        self.commands.push(PathCmd::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCmd::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Rotate the whole path about the origin in quarter turns (clockwise,
    /// y-down). Exact: no trigonometry on the stored points.
    pub fn rotate_quarter(&self, quarter_turns: u8) -> Path {
        let quarter_turns = quarter_turns % 4;
        if quarter_turns == 0 {
            return self.clone();
        }
        let rot = f64::from(quarter_turns) * std::f64::consts::FRAC_PI_2;
        let commands = self
            .commands
            .iter()
            .map(|cmd| match *cmd {
                PathCmd::MoveTo(p) => PathCmd::MoveTo(p.rotate_quarter(quarter_turns)),
                PathCmd::LineTo(p) => PathCmd::LineTo(p.rotate_quarter(quarter_turns)),
                PathCmd::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => PathCmd::Arc {
                    center: center.rotate_quarter(quarter_turns),
                    radius,
                    start_angle: start_angle + rot,
                    end_angle: end_angle + rot,
                },
                PathCmd::Close => PathCmd::Close,
            })
            .collect();
        Path { commands }
    }

    pub fn translate(&self, offset: Point) -> Path {
        let commands = self
            .commands
            .iter()
            .map(|cmd| match *cmd {
                PathCmd::MoveTo(p) => PathCmd::MoveTo(p + offset),
                PathCmd::LineTo(p) => PathCmd::LineTo(p + offset),
                PathCmd::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => PathCmd::Arc {
                    center: center + offset,
                    radius,
                    start_angle,
                    end_angle,
                },
                PathCmd::Close => PathCmd::Close,
            })
            .collect();
        Path { commands }
    }

    /// Flatten into straight-segment subpaths. Arcs are subdivided so no
    /// segment is longer than `detail` (at least 4 segments per arc); line
    /// segments are kept as-is.
    pub fn flatten(&self, detail: f64) -> Vec<Polyline> {
        let mut result = Vec::new();
        let mut current = Polyline::default();

        for cmd in &self.commands {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    flush(&mut result, &mut current);
                    current.points.push(p);
                }
                PathCmd::LineTo(p) => {
                    current.points.push(p);
                }
                PathCmd::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    for p in arc_points(center, radius, start_angle, end_angle, detail) {
                        // Skip a duplicated junction point.
                        if current.points.last().is_some_and(|last| last.distance(p) < 1e-9) {
                            continue;
                        }
                        current.points.push(p);
                    }
                }
                PathCmd::Close => {
                    current.closed = true;
                    flush(&mut result, &mut current);
                }
            }
        }
        flush(&mut result, &mut current);
        result
    }

    /// Emit the path as an SVG `d` attribute, using native `A` arc commands.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        let mut current: Option<Point> = None;
        for cmd in &self.commands {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    push_cmd(&mut d, 'M', p);
                    current = Some(p);
                }
                PathCmd::LineTo(p) => {
                    push_cmd(&mut d, 'L', p);
                    current = Some(p);
                }
                PathCmd::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    let start = point_on_circle(center, radius, start_angle);
                    let end = point_on_circle(center, radius, end_angle);
                    match current {
                        None => push_cmd(&mut d, 'M', start),
                        Some(p) if p.distance(start) > 1e-9 => push_cmd(&mut d, 'L', start),
                        _ => {}
                    }
                    let delta = end_angle - start_angle;
                    let large_arc = i32::from(delta.abs() > std::f64::consts::PI);
                    let sweep = i32::from(delta > 0.0);
                    if !d.is_empty() {
                        d.push(' ');
                    }
                    d.push_str(&format!(
                        "A {r} {r} 0 {large_arc} {sweep} {x} {y}",
                        r = fmt_coord(radius),
                        x = fmt_coord(end.x),
                        y = fmt_coord(end.y)
                    ));
                    current = Some(end);
                }
                PathCmd::Close => {
                    if !d.is_empty() {
                        d.push(' ');
                    }
                    d.push('Z');
                }
            }
        }
        d
    }
}

impl Polyline {
    /// Total length of all segments (including the closing one).
    pub fn length(&self) -> f64 {
        let mut len: f64 = self.points.windows(2).map(|seg| seg[0].distance(seg[1])).sum();
        if self.closed && self.points.len() > 1 {
            len += self.points[self.points.len() - 1].distance(self.points[0]);
        }
        len
    }
}

pub(crate) fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Sample an arc into points, including both endpoints.
pub(crate) fn arc_points(center: Point, radius: f64, start_angle: f64, end_angle: f64, detail: f64) -> Vec<Point> {
    let arc_len = radius * (end_angle - start_angle).abs();
    let detail = detail.max(1e-6);
    let segments = ((arc_len / detail).ceil() as usize).max(4);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            point_on_circle(center, radius, start_angle + t * (end_angle - start_angle))
        })
        .collect()
}

fn flush(result: &mut Vec<Polyline>, current: &mut Polyline) {
    if current.points.len() > 1 {
        result.push(std::mem::take(current));
    } else {
        current.points.clear();
        current.closed = false;
    }
}

fn push_cmd(d: &mut String, letter: char, p: Point) {
    if !d.is_empty() {
        d.push(' ');
    }
    d.push(letter);
    d.push(' ');
    d.push_str(&fmt_coord(p.x));
    d.push(' ');
    d.push_str(&fmt_coord(p.y));
}

/// Format a coordinate with limited precision and no trailing zeros.
fn fmt_coord(v: f64) -> String {
    let mut s = format!("{v:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_flatten_lines() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0).close();
        let polys = path.flatten(1.0);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].points.len(), 3);
        assert!(polys[0].closed);
        assert!((polys[0].length() - (10.0 + 10.0 + 200.0_f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_flatten_arc_segment_count() {
        let mut path = Path::new();
        path.arc(Point::new(0.0, 0.0), 100.0, 0.0, FRAC_PI_2);
        // Quarter circumference ~157; detail 10 => 16 segments, 17 points.
        let polys = path.flatten(10.0);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].points.len(), 17);
        // Endpoints are exact.
        assert!(polys[0].points[0].distance(Point::new(100.0, 0.0)) < 1e-9);
        assert!(polys[0].points[16].distance(Point::new(0.0, 100.0)) < 1e-9);
    }

    #[test]
    fn test_flatten_arc_minimum_segments() {
        let mut path = Path::new();
        path.arc(Point::new(0.0, 0.0), 0.5, 0.0, FRAC_PI_2);
        let polys = path.flatten(100.0);
        assert_eq!(polys[0].points.len(), 5);
    }

    #[test]
    fn test_rotate_quarter_arc() {
        let mut path = Path::new();
        path.arc(Point::new(1.0, 0.0), 2.0, 0.0, FRAC_PI_2);
        let rotated = path.rotate_quarter(2);
        match rotated.commands[0] {
            PathCmd::Arc {
                center, start_angle, ..
            } => {
                assert!(center.distance(Point::new(-1.0, 0.0)) < 1e-9);
                assert!((start_angle - PI).abs() < 1e-9);
            }
            _ => panic!("expected arc"),
        }
    }

    #[test]
    fn test_svg_data() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(4.5, 0.0);
        path.arc(Point::new(4.5, 4.0), 4.0, -FRAC_PI_2, 0.0);
        path.close();
        let d = path.to_svg_data();
        assert_eq!(d, "M 0 0 L 4.5 0 A 4 4 0 0 1 8.5 4 Z");
    }
}
