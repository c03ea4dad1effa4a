use crate::Path;

/// An RGBA color. Styling in scenes is explicit per draw op; nothing keeps
/// implicit "current color" state between shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

/// How a shape's path is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    /// Closed path, filled (even-odd).
    Fill,
    /// Open path stroked as a centerline with the given pen width
    /// (butt caps).
    Stroke { width: f64 },
}

/// A path plus its paint style.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub path: Path,
    pub style: PaintStyle,
}

impl Shape {
    pub fn filled(path: Path) -> Self {
        Shape {
            path,
            style: PaintStyle::Fill,
        }
    }

    pub fn stroked(path: Path, width: f64) -> Self {
        Shape {
            path,
            style: PaintStyle::Stroke { width },
        }
    }

    pub fn translate(&self, offset: crate::Point) -> Shape {
        Shape {
            path: self.path.translate(offset),
            style: self.style,
        }
    }
}

/// One scene entry: shape, color and opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub shape: Shape,
    pub color: Color,
    pub opacity: f64,
}

/// An ordered list of draw operations.
///
/// Scenes are the hand-off point between the producers (module drawer,
/// editor) and the consumers (SVG export, raster export); producing a scene
/// has no side effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn push(&mut self, shape: Shape, color: Color, opacity: f64) {
        self.ops.push(DrawOp { shape, color, opacity });
    }

    pub fn push_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>, color: Color, opacity: f64) {
        for shape in shapes {
            self.push(shape, color, opacity);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}
