//! # Tessel
//!
//! A declarative terminal UI compositor.
//!
//! Applications describe each frame as a tree of [`Node`]s. Tessel lays
//! the tree out, rasterizes it into a [`Buffer`] of character cells,
//! diffs that buffer against the previous frame and writes only the
//! escape sequences needed to bring the screen up to date.
//!
//! ## Core Concepts
//!
//! - **Node tree**: text, box, row, column, list, pane and spacer nodes
//! - **Layout**: flex weights, explicit sizes, word wrap and scrolling
//! - **Cell diffing**: changed cells grouped into horizontal runs
//! - **Minimal SGR**: style sequences only where the pen actually changes
//! - **Actor model**: input and rendering on their own threads
//!
//! ## Example
//!
//! ```rust
//! use tessel::{Border, Compositor, Node};
//!
//! let ui = Node::column(vec![
//!     Node::boxed(Border::Rounded, Node::text("hello")),
//!     Node::spacer(),
//!     Node::text("q to quit"),
//! ]);
//!
//! let mut compositor = Compositor::new();
//! let mut out = Vec::new();
//! compositor.frame(&ui, 20, 5, &mut out).unwrap();
//!
//! // Nothing changed, nothing to write.
//! out.clear();
//! compositor.frame(&ui, 20, 5, &mut out).unwrap();
//! assert!(out.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod compositor;
pub mod focus;
pub mod layout;
pub mod node;
pub mod paint;
pub mod terminal;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, InputEvent, KeyCode, KeyModifiers, RenderCommand};
pub use buffer::diff::{diff, full_redraw};
pub use buffer::{Buffer, Cell, Change, Pen};
pub use compositor::{compose, Compositor, Frame, FrameStats};
pub use focus::FocusManager;
pub use layout::{layout, LayoutNode, Rect};
pub use node::{Border, Color, Node, NodeKind, Props, Style};
pub use paint::paint;
pub use terminal::{render, OutputBuffer, Session, SessionOptions};
