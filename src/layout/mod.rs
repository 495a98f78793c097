//! Layout module: geometry for a node tree.
//!
//! Layouts are recomputed from scratch every frame. The result is a
//! [`LayoutNode`] tree parallel to the input [`Node`](crate::Node) tree,
//! carrying an absolute [`Rect`] for every node.

mod rect;
mod tree;
pub mod wrap;

pub use rect::Rect;
pub use tree::{layout, LayoutNode, PreOrder};
