//! Painter: rasterize a laid-out tree into a [`Buffer`].
//!
//! Traversal is pre-order: a node paints itself, then its children
//! paint on top of it. Each child inherits a clip rectangle equal to the
//! intersection of its parent's clip and the parent's own rectangle, so
//! nothing ever escapes a scrolled or overflowing container.

use crate::buffer::{Buffer, Cell, Pen};
use crate::layout::wrap::wrap;
use crate::layout::{LayoutNode, Rect};
use crate::node::{Node, NodeKind};

/// Paint `tree` into `buffer`.
///
/// The buffer is not cleared first; callers paint into a fresh buffer.
pub fn paint(buffer: &mut Buffer, tree: &LayoutNode<'_>) {
    let clip = tree.rect.intersection(&buffer.area());
    paint_node(buffer, tree, clip);
}

fn paint_node(buffer: &mut Buffer, layout: &LayoutNode<'_>, clip: Rect) {
    let rect = layout.rect;
    match layout.node.kind {
        NodeKind::Text => paint_text(buffer, layout.node, rect, clip),
        NodeKind::Box => paint_box(buffer, layout.node, rect, clip),
        NodeKind::Row | NodeKind::Column | NodeKind::List | NodeKind::Pane | NodeKind::Spacer => {}
    }

    let child_clip = rect.intersection(&clip);
    if child_clip.is_empty() {
        return;
    }
    for child in &layout.children {
        if child.rect.intersects(&child_clip) {
            paint_node(buffer, child, child_clip);
        }
    }
}

fn pen_of(node: &Node) -> Pen {
    Pen::new(node.props.fg, node.props.bg, node.props.style)
}

fn paint_text(buffer: &mut Buffer, node: &Node, rect: Rect, clip: Rect) {
    let visible = rect.intersection(&clip);
    if visible.is_empty() {
        return;
    }

    let pen = pen_of(node);
    if pen.bg.is_set() {
        buffer.fill_rect(visible, Cell::blank(pen.bg));
    }

    for (y, line) in (rect.y..).zip(wrap(&node.props.text, rect.width)) {
        if y >= visible.bottom() {
            break;
        }
        if y < visible.y {
            continue;
        }
        for (x, ch) in (rect.x..).zip(line.chars()) {
            if x >= visible.right() {
                break;
            }
            if x >= visible.x {
                buffer.set(x, y, Cell::with_pen(ch, pen));
            }
        }
    }
}

fn paint_box(buffer: &mut Buffer, node: &Node, rect: Rect, clip: Rect) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let Some(glyphs) = node.props.border.glyphs() else {
        return;
    };

    let pen = pen_of(node);
    let mut put = |x: i32, y: i32, ch: char| {
        if clip.contains(x, y) {
            buffer.set(x, y, Cell::with_pen(ch, pen));
        }
    };

    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

    put(left, top, glyphs.top_left);
    put(right, top, glyphs.top_right);
    put(left, bottom, glyphs.bottom_left);
    put(right, bottom, glyphs.bottom_right);

    for x in left + 1..right {
        put(x, top, glyphs.horizontal);
        put(x, bottom, glyphs.horizontal);
    }
    for y in top + 1..bottom {
        put(left, y, glyphs.vertical);
        put(right, y, glyphs.vertical);
    }
}
