//! Output backends. Both consume a [`crate::Scene`]; with the same wobble
//! effect and seed they emit the same displaced vertex sequence.

mod raster;
mod svg;

pub use raster::*;
pub use svg::*;
