//! Terminal module: byte-level output and terminal mode control.
//!
//! This module contains:
//! - [`OutputBuffer`]: Accumulates escape sequences for a single write
//! - [`render`]: Encodes change runs into cursor moves, SGR and glyphs
//! - [`Session`]: Raw mode / alternate screen guard

mod output;
mod render;
mod session;

pub use output::OutputBuffer;
pub use render::{encode, render};
pub use session::{Session, SessionOptions};
