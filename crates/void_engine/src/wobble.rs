//! Coherent-noise displacement of path geometry.
//!
//! [`NoiseGenerator`] is a seeded 2D simplex noise; [`WobblyEffect`]
//! densifies a [`Path`] and displaces every vertex by a noise offset in
//! surface space. The same displaced vertex sequence feeds both the SVG
//! and the raster backend, which keeps the two outputs reconcilable for a
//! given seed.

use crate::path::{arc_points, point_on_circle};
use crate::{Path, PathCmd, Point};

/// Skew factors for 2D simplex noise.
const F2: f64 = 0.366_025_403_784_438_6;
const G2: f64 = 0.211_324_865_405_187_1;

/// Gradient set for 2D simplex noise.
const GRAD2: [(f64, f64); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Domain shift between the x and the y noise channel.
const SECOND_CHANNEL_OFFSET: f64 = 4096.0;

/// Seeded 2D simplex noise.
///
/// `noise2d` is a pure function of the seed and the coordinates: the same
/// seed always reproduces the same field, which is what makes wobbled SVG
/// exports match the live rendering.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    seed: u64,
    perm: [u8; 512],
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = fastrand::Rng::with_seed(seed);
        // Fisher-Yates with the seeded generator.
        for i in (1..256).rev() {
            table.swap(i, rng.usize(..=i));
        }
        let perm = std::array::from_fn(|i| table[i & 255]);
        NoiseGenerator { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 2D simplex noise in `[-1, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Which simplex triangle of the skewed cell we are in.
        let (i1, j1) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };
        let x1 = x0 - i1 + G2;
        let y1 = y0 - j1 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = self.perm[ii + self.perm[jj] as usize] as usize % GRAD2.len();
        let gi1 = self.perm[ii + i1 as usize + self.perm[jj + j1 as usize] as usize] as usize % GRAD2.len();
        let gi2 = self.perm[ii + 1 + self.perm[jj + 1] as usize] as usize % GRAD2.len();

        let mut total = 0.0;
        for (gi, dx, dy) in [(gi0, x0, y0), (gi1, x1, y1), (gi2, x2, y2)] {
            let t = 0.5 - dx * dx - dy * dy;
            if t > 0.0 {
                let t = t * t;
                let (gx, gy) = GRAD2[gi];
                total += t * t * (gx * dx + gy * dy);
            }
        }
        70.0 * total
    }

    /// Displacement vector from two independent noise lookups; the second
    /// channel samples a far-away region of the same field.
    pub fn offset(&self, x: f64, y: f64, frequency: f64, amplitude: f64) -> Point {
        let dx = self.noise2d(x * frequency, y * frequency);
        let dy = self.noise2d(x * frequency + SECOND_CHANNEL_OFFSET, y * frequency + SECOND_CHANNEL_OFFSET);
        Point::new(dx * amplitude, dy * amplitude)
    }
}

/// Noise-based perturbation of straight and arc segments.
#[derive(Debug, Clone)]
pub struct WobblyEffect {
    pub enabled: bool,
    /// Maximum displacement in surface units. 0 disables the effect.
    pub amplitude: f64,
    /// Noise frequency in 1/surface-units.
    pub frequency: f64,
    /// Maximum length of a densified segment, in surface units.
    pub detail: f64,
    /// World-space offset added before the noise lookup, so shapes drawn
    /// independently but sharing a frame wobble continuously.
    pub origin: Point,
    noise: NoiseGenerator,
}

impl WobblyEffect {
    pub fn new(seed: u64) -> Self {
        WobblyEffect {
            enabled: true,
            amplitude: 2.0,
            frequency: 0.02,
            detail: 4.0,
            origin: Point::default(),
            noise: NoiseGenerator::new(seed),
        }
    }

    /// Replace the noise field with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        self.noise = NoiseGenerator::new(seed);
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.amplitude != 0.0
    }

    /// Displacement at a surface-space point. Identity when the effect is
    /// disabled or the amplitude is zero.
    pub fn displacement(&self, x: f64, y: f64) -> Point {
        if !self.is_active() {
            return Point::default();
        }
        self.noise
            .offset(self.origin.x + x, self.origin.y + y, self.frequency, self.amplitude)
    }

    /// Densify and displace a path.
    ///
    /// Line segments longer than `detail` are split into at least 2 parts,
    /// arcs into at least 4; every resulting vertex is then moved by the
    /// noise displacement. The implicit closing edge of a closed subpath
    /// is densified like any other line segment. The output contains only
    /// move/line/close commands. When the effect is inactive the path is
    /// returned unchanged.
    pub fn apply(&self, path: &Path) -> Path {
        if !self.is_active() {
            return path.clone();
        }

        let mut out = Path::new();
        // Current point and subpath start, in undisplaced coordinates.
        let mut current: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;

        for cmd in &path.commands {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    let d = p + self.displacement(p.x, p.y);
                    out.move_to(d.x, d.y);
                    current = Some(p);
                    subpath_start = Some(p);
                }
                PathCmd::LineTo(p) => {
                    match current {
                        Some(from) => self.push_line(&mut out, from, p),
                        None => {
                            let d = p + self.displacement(p.x, p.y);
                            out.move_to(d.x, d.y);
                            subpath_start = Some(p);
                        }
                    }
                    current = Some(p);
                }
                PathCmd::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    let points = arc_points(center, radius, start_angle, end_angle, self.detail);
                    let start = points[0];
                    match current {
                        Some(from) if from.distance(start) > 1e-9 => self.push_line(&mut out, from, start),
                        Some(_) => {}
                        None => {
                            let d = start + self.displacement(start.x, start.y);
                            out.move_to(d.x, d.y);
                            subpath_start = Some(start);
                        }
                    }
                    for p in points.into_iter().skip(1) {
                        let d = p + self.displacement(p.x, p.y);
                        out.line_to(d.x, d.y);
                    }
                    current = Some(point_on_circle(center, radius, end_angle));
                }
                PathCmd::Close => {
                    // The implicit edge back to the subpath start wobbles
                    // like an explicit one.
                    if let (Some(from), Some(to)) = (current, subpath_start) {
                        if from.distance(to) > 1e-9 {
                            self.push_line(&mut out, from, to);
                        }
                    }
                    out.close();
                    current = subpath_start;
                }
            }
        }
        out
    }

    /// Subdivided, displaced line from `from` to `to` (endpoints excluded /
    /// included respectively).
    fn push_line(&self, out: &mut Path, from: Point, to: Point) {
        let len = from.distance(to);
        let segments = if len > self.detail {
            ((len / self.detail).ceil() as usize).max(2)
        } else {
            1
        };
        for i in 1..=segments {
            let t = i as f64 / segments as f64;
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            let d = p + self.displacement(p.x, p.y);
            out.line_to(d.x, d.y);
        }
    }
}
