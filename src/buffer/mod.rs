//! Buffer module: the rasterization target and its diffing engine.
//!
//! This module contains:
//! - [`Cell`]: One character position (glyph + pen)
//! - [`Pen`]: Foreground, background and style of a cell
//! - [`Buffer`]: A grid of cells representing the terminal screen
//! - [`diff`]: Diffing engine producing minimal changed-cell runs

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use buffer::Buffer;
pub use cell::{Cell, Pen};
pub use diff::Change;
