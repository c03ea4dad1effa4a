//! Glyph grid editor state machine.
//!
//! The editor owns one [`Glyph`] plus a *pen* (the module kind and rotation
//! that gets stamped into empty cells). Pointer, keyboard and gamepad
//! adapters all funnel into the same few operations; rendering produces a
//! [`Scene`] and has no other side effects.

use crate::{
    draw_module, Color, Glyph, Module, ModuleKind, Path, RenderOptions, Rotation, Scene, Shape, GRID_SIZE,
    MODULE_KINDS,
};

/// Ink used for stamped modules.
pub const INK: Color = Color::BLACK;
/// Grid line color.
pub const GRID_LINE: Color = Color::rgb(190, 190, 190);
/// Opacity of the hover ghost preview.
pub const GHOST_OPACITY: f64 = 0.5;

/// The editor's current drawing tool: a module kind plus rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen {
    kind_index: usize,
    rotation: Rotation,
}

impl Pen {
    pub fn kind(self) -> ModuleKind {
        MODULE_KINDS[self.kind_index]
    }

    pub fn rotation(self) -> Rotation {
        self.rotation
    }

    pub fn module(self) -> Module {
        Module::new(self.kind(), self.rotation)
    }

    /// Cycle the kind through the fixed module list, wrapping.
    pub fn cycle(&mut self, delta: i32) {
        let len = MODULE_KINDS.len() as i32;
        self.kind_index = (self.kind_index as i32 + delta).rem_euclid(len) as usize;
    }

    /// Step the rotation in quarter turns, wrapping.
    pub fn rotate(&mut self, delta: i32) {
        self.rotation = self.rotation.stepped(delta);
    }
}

/// Pixel placement of the 5×5 grid, centered in its drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell: f64,
}

impl GridLayout {
    /// Fraction of the short surface side used by the grid.
    const GRID_FRACTION: f64 = 0.9;

    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        let side = surface_width.min(surface_height).max(0.0) * Self::GRID_FRACTION;
        let cell = side / GRID_SIZE as f64;
        GridLayout {
            origin_x: (surface_width - side) / 2.0,
            origin_y: (surface_height - side) / 2.0,
            cell,
        }
    }

    /// Map a surface pixel to a grid cell. Pixels outside the grid map to
    /// `None`; they are never clamped into a valid cell.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(i32, i32)> {
        if self.cell <= 0.0 {
            return None;
        }
        let col = ((x - self.origin_x) / self.cell).floor();
        let row = ((y - self.origin_y) / self.cell).floor();
        let range = 0.0..GRID_SIZE as f64;
        if range.contains(&col) && range.contains(&row) {
            Some((row as i32, col as i32))
        } else {
            None
        }
    }

    /// Center of a cell in surface coordinates.
    pub fn cell_center(&self, row: i32, col: i32) -> crate::Point {
        crate::Point::new(
            self.origin_x + (f64::from(col) + 0.5) * self.cell,
            self.origin_y + (f64::from(row) + 0.5) * self.cell,
        )
    }
}

/// Build the scene for one glyph at the given layout; shared by the editor
/// and the standalone render surface.
pub fn glyph_scene(glyph: &Glyph, layout: &GridLayout, options: &RenderOptions, color: Color) -> Scene {
    let mut scene = Scene::new();
    for (row, col, module) in glyph.occupied_cells() {
        let center = layout.cell_center(row as i32, col as i32);
        let shapes = draw_module(module, layout.cell, options);
        scene.push_shapes(shapes.iter().map(|shape| shape.translate(center)), color, 1.0);
    }
    scene
}

/// Interactive editor over a single glyph.
pub struct GlyphEditor {
    glyph: Glyph,
    pen: Pen,
    layout: GridLayout,
    options: RenderOptions,
    hover: Option<(i32, i32)>,
    cursor: (i32, i32),
    active: bool,
}

impl GlyphEditor {
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        GlyphEditor {
            glyph: Glyph::new(),
            pen: Pen::default(),
            layout: GridLayout::new(surface_width, surface_height),
            options: RenderOptions::default(),
            hover: None,
            cursor: (0, 0),
            active: false,
        }
    }

    /// Attach the editor. Idempotent.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Detach the editor; the next render produces an empty scene.
    /// Idempotent.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.hover = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.layout = GridLayout::new(width, height);
    }

    /// Cycle the pen's module kind.
    pub fn cycle_module(&mut self, delta: i32) {
        self.pen.cycle(delta);
    }

    /// Step the pen's rotation.
    pub fn rotate_pen(&mut self, delta: i32) {
        self.pen.rotate(delta);
    }

    /// Toggle a cell: clear it when occupied, stamp the pen when empty.
    /// Out-of-range coordinates are a no-op.
    pub fn toggle_cell(&mut self, row: i32, col: i32) {
        match self.glyph.get(row, col) {
            Some(module) if !module.is_empty() => {
                self.glyph.clear(row, col);
            }
            Some(_) => {
                self.glyph.set(row, col, self.pen.module());
            }
            None => {}
        }
    }

    /// Toggle the cell under a surface pixel; pixels outside the grid do
    /// nothing.
    pub fn toggle_at_pixel(&mut self, x: f64, y: f64) {
        if let Some((row, col)) = self.layout.cell_at(x, y) {
            self.toggle_cell(row, col);
        }
    }

    /// Update the hover cell from a pointer position.
    pub fn set_hover(&mut self, x: f64, y: f64) {
        self.hover = self.layout.cell_at(x, y);
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hover(&self) -> Option<(i32, i32)> {
        self.hover
    }

    /// Move the keyboard/gamepad cursor, clamped to the grid.
    pub fn move_cursor(&mut self, drow: i32, dcol: i32) {
        let max = GRID_SIZE as i32 - 1;
        self.cursor.0 = (self.cursor.0 + drow).clamp(0, max);
        self.cursor.1 = (self.cursor.1 + dcol).clamp(0, max);
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Toggle the cell under the cursor.
    pub fn stamp_at_cursor(&mut self) {
        self.toggle_cell(self.cursor.0, self.cursor.1);
    }

    /// Serialize the grid.
    pub fn code(&self) -> String {
        self.glyph.to_code()
    }

    /// Replace the grid from a serialized code. On any decode error the
    /// grid stays untouched; the failure is logged, not raised.
    pub fn load_code(&mut self, code: &str) {
        match Glyph::from_code(code) {
            Ok(glyph) => self.glyph = glyph,
            Err(err) => log::warn!("ignoring invalid glyph code: {err}"),
        }
    }

    pub fn set_glyph(&mut self, glyph: Glyph) {
        self.glyph = glyph;
    }

    pub fn clear(&mut self) {
        self.glyph = Glyph::new();
    }

    /// Build the current frame: grid lines, the hover ghost (only over an
    /// empty cell), then all occupied cells. Pure; an inactive editor
    /// yields an empty scene.
    pub fn render(&self) -> Scene {
        if !self.active {
            return Scene::new();
        }

        let mut scene = Scene::new();
        self.push_grid_lines(&mut scene);

        if let Some((row, col)) = self.hover {
            if self.glyph.get(row, col).is_some_and(Module::is_empty) {
                let center = self.layout.cell_center(row, col);
                let shapes = draw_module(self.pen.module(), self.layout.cell, &self.options);
                scene.push_shapes(shapes.iter().map(|shape| shape.translate(center)), INK, GHOST_OPACITY);
            }
        }

        let glyph_part = glyph_scene(&self.glyph, &self.layout, &self.options, INK);
        scene.ops.extend(glyph_part.ops);
        scene
    }

    fn push_grid_lines(&self, scene: &mut Scene) {
        let side = self.layout.cell * GRID_SIZE as f64;
        for i in 0..=GRID_SIZE {
            let offset = i as f64 * self.layout.cell;
            let mut vertical = Path::new();
            vertical
                .move_to(self.layout.origin_x + offset, self.layout.origin_y)
                .line_to(self.layout.origin_x + offset, self.layout.origin_y + side);
            scene.push(Shape::stroked(vertical, 1.0), GRID_LINE, 1.0);

            let mut horizontal = Path::new();
            horizontal
                .move_to(self.layout.origin_x, self.layout.origin_y + offset)
                .line_to(self.layout.origin_x + side, self.layout.origin_y + offset);
            scene.push(Shape::stroked(horizontal, 1.0), GRID_LINE, 1.0);
        }
    }
}
