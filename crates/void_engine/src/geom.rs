use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A point (or vector) in drawing-surface space.
///
/// The y axis points down, matching canvas and SVG conventions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Rotate about the origin by `quarter_turns * 90°` clockwise (y-down).
    ///
    /// Implemented with exact coordinate swaps so that repeated rotation
    /// never accumulates floating point drift.
    pub fn rotate_quarter(self, quarter_turns: u8) -> Point {
        match quarter_turns % 4 {
            1 => Point::new(-self.y, self.x),
            2 => Point::new(-self.x, -self.y),
            3 => Point::new(self.y, -self.x),
            _ => self,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}
