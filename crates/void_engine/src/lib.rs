#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Rendering and editing core for the Void parametric typeface.
//!
//! A glyph is a 5×5 grid of rotatable geometric modules. This crate owns the
//! module geometry, the glyph string codec, the grid editor state machine,
//! the wobbly-noise post effect and the SVG/raster export backends.

mod error;
pub use error::*;

mod geom;
pub use geom::*;

mod module;
pub use module::*;

mod glyph;
pub use glyph::*;

mod path;
pub use path::*;

mod scene;
pub use scene::*;

pub mod render;
pub use render::*;

mod wobble;
pub use wobble::*;

mod editor;
pub use editor::*;

mod alphabet;
pub use alphabet::*;

pub mod export;
pub use export::*;

/// Side length of the glyph grid, in cells.
pub const GRID_SIZE: usize = 5;

/// Number of cells in a glyph.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Length of a serialized glyph string: two characters per cell.
pub const GLYPH_CODE_LEN: usize = CELL_COUNT * 2;
