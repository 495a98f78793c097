//! Layout engine: turns a [`Node`] tree into absolute rectangles.
//!
//! Layout runs in two passes that share the same sizing rules:
//! `measure` computes a node's natural size for a given available
//! width, and `place` assigns concrete rectangles top-down.
//!
//! Horizontal space is never over-allocated: a Row hands out at most
//! its own width. Vertical containers may hold more content than they
//! show; their children keep full content height and are positioned
//! relative to the scroll offset, and the painter clips them.

use super::rect::Rect;
use super::wrap::{widest, wrap};
use crate::node::{Node, NodeKind, Props};
use std::collections::HashMap;

/// A node paired with its absolute rectangle in viewport coordinates.
///
/// Rectangles are not clipped to their ancestors. Children of a
/// scrolled or overflowing vertical container keep their content
/// position, which may lie above or below the parent (or outside the
/// viewport). Consumers that need visible geometry, such as hit
/// testing, intersect each rectangle with its parent's.
#[derive(Clone, Debug)]
pub struct LayoutNode<'a> {
    /// The source node.
    pub node: &'a Node,
    /// Absolute position and size.
    pub rect: Rect,
    /// Laid-out children, in node order.
    pub children: Vec<LayoutNode<'a>>,
}

impl<'a> LayoutNode<'a> {
    /// Iterate over this node and all descendants in pre-order.
    pub fn iter(&self) -> PreOrder<'_, 'a> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order, depth-first iterator over a layout tree.
#[derive(Debug)]
pub struct PreOrder<'t, 'a> {
    stack: Vec<&'t LayoutNode<'a>>,
}

impl<'t, 'a> Iterator for PreOrder<'t, 'a> {
    type Item = &'t LayoutNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Lay out `root` inside a viewport of the given size.
///
/// A viewport with a non-positive dimension produces a zero-sized root
/// without children.
pub fn layout(root: &Node, viewport_width: i32, viewport_height: i32) -> LayoutNode<'_> {
    if viewport_width <= 0 || viewport_height <= 0 {
        return LayoutNode {
            node: root,
            rect: Rect::ZERO,
            children: Vec::new(),
        };
    }

    let width = explicit(root.props.width).map_or(viewport_width, |w| w.min(viewport_width));
    let height = explicit(root.props.height).map_or(viewport_height, |h| h.min(viewport_height));
    Pass::default().place(root, Rect::new(0, 0, width, height))
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
struct Size {
    width: i32,
    height: i32,
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Width handed to a Row child, with the size it measured while widths
/// were handed out (fixed children only).
#[derive(Clone, Copy)]
struct Slot {
    width: i32,
    measured: Option<Size>,
}

fn explicit(value: u16) -> Option<i32> {
    (value > 0).then(|| i32::from(value))
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Flex weight along `axis`; an explicit size on that axis makes the
/// node fixed.
fn flex_weight(node: &Node, axis: Axis) -> i32 {
    let fixed = match axis {
        Axis::Horizontal => node.props.width,
        Axis::Vertical => node.props.height,
    };
    if fixed > 0 {
        0
    } else {
        i32::from(node.props.flex)
    }
}

fn row_child_height(child: &Node, measured: i32) -> i32 {
    explicit(child.props.height).unwrap_or(measured)
}

/// Share `total` among children: bases first, then leftover by weight.
///
/// The integer remainder goes one cell at a time to flexible children
/// in order.
fn distribute(total: i32, bases: &[i32], weights: &[i32]) -> Vec<i32> {
    let mut sizes = bases.to_vec();
    let leftover = total - bases.iter().sum::<i32>();
    let total_weight: i32 = weights.iter().sum();
    if leftover <= 0 || total_weight <= 0 {
        return sizes;
    }

    let unit = leftover / total_weight;
    let mut remainder = leftover % total_weight;
    for (size, &weight) in sizes.iter_mut().zip(weights) {
        *size += unit * weight;
    }
    while remainder > 0 {
        for (size, &weight) in sizes.iter_mut().zip(weights) {
            if remainder == 0 {
                break;
            }
            if weight > 0 {
                *size += 1;
                remainder -= 1;
            }
        }
    }
    sizes
}

/// Rows hidden above the visible window.
fn scroll_offset(props: &Props, content: i32, visible: i32) -> i32 {
    let overflow = (content - visible).max(0);
    if props.scroll_to_bottom {
        overflow
    } else {
        i32::from(props.scroll_offset).min(overflow)
    }
}

/// State for a single layout call.
///
/// Measurements are memoized per node and available width, so a subtree
/// measured while its parent is sized is not measured again when it is
/// placed. Keys are node addresses, which stay valid because the tree
/// is borrowed for the whole pass.
#[derive(Default)]
struct Pass {
    sizes: HashMap<(*const Node, i32), Size>,
    computed: usize,
}

impl Pass {
    /// Natural size of `node` given `avail` columns. Width never exceeds
    /// `avail`; height is unbounded.
    fn measure(&mut self, node: &Node, avail: i32) -> Size {
        let avail = avail.max(0);
        let key = (std::ptr::from_ref(node), avail);
        if let Some(&size) = self.sizes.get(&key) {
            return size;
        }
        let size = self.compute(node, avail);
        self.computed += 1;
        self.sizes.insert(key, size);
        size
    }

    fn compute(&mut self, node: &Node, avail: i32) -> Size {
        let props = &node.props;
        let limit = explicit(props.width).map_or(avail, |w| w.min(avail));

        let natural = match node.kind {
            NodeKind::Text => {
                let lines = wrap(&props.text, limit);
                Size {
                    width: widest(&lines),
                    height: count(lines.len()),
                }
            }
            NodeKind::Box => {
                let border = props.border.thickness();
                let inner = node
                    .children
                    .first()
                    .map_or(Size::default(), |child| self.measure(child, limit - 2 * border));
                Size {
                    width: inner.width + 2 * border,
                    height: inner.height + 2 * border,
                }
            }
            NodeKind::Row => {
                let slots = self.row_slots(node, limit);
                let mut height = 0;
                for (child, slot) in node.children.iter().zip(&slots) {
                    // A child keeps its size when handed exactly the width
                    // it measured.
                    let measured = match slot.measured {
                        Some(size) if size.width == slot.width => size.height,
                        _ => self.measure(child, slot.width).height,
                    };
                    height = height.max(row_child_height(child, measured));
                }
                let flexible = node
                    .children
                    .iter()
                    .any(|child| flex_weight(child, Axis::Horizontal) > 0);
                Size {
                    width: if flexible {
                        limit
                    } else {
                        slots.iter().map(|slot| slot.width).sum()
                    },
                    height,
                }
            }
            NodeKind::Column | NodeKind::List | NodeKind::Pane => {
                let mut size = Size::default();
                for child in &node.children {
                    let child_size = self.measure(child, limit);
                    size.width = size.width.max(child_size.width);
                    if flex_weight(child, Axis::Vertical) == 0 {
                        size.height += child_size.height;
                    }
                }
                size
            }
            NodeKind::Spacer => Size::default(),
        };

        Size {
            width: explicit(props.width).unwrap_or(natural.width).min(limit),
            height: explicit(props.height).unwrap_or(natural.height),
        }
    }

    /// Column widths for the children of a Row with `avail` columns.
    fn row_slots(&mut self, node: &Node, avail: i32) -> Vec<Slot> {
        let mut remaining = avail.max(0);
        let mut measured = Vec::with_capacity(node.children.len());
        let mut bases = Vec::with_capacity(node.children.len());
        let mut weights = Vec::with_capacity(node.children.len());

        for child in &node.children {
            let weight = flex_weight(child, Axis::Horizontal);
            let size = (weight == 0).then(|| self.measure(child, remaining));
            let base = size.map_or(0, |size| size.width);
            remaining -= base;
            measured.push(size);
            bases.push(base);
            weights.push(weight);
        }

        distribute(avail.max(0), &bases, &weights)
            .into_iter()
            .zip(measured)
            .map(|(width, measured)| Slot { width, measured })
            .collect()
    }

    /// Heights for the children of a vertical container, plus the total
    /// content height. Flex children only grow when the content fits.
    fn stack_heights(&mut self, node: &Node, width: i32, visible: i32) -> (Vec<i32>, i32) {
        let mut bases = Vec::with_capacity(node.children.len());
        let mut weights = Vec::with_capacity(node.children.len());

        for child in &node.children {
            let weight = flex_weight(child, Axis::Vertical);
            let base = if weight > 0 {
                0
            } else {
                self.measure(child, width).height
            };
            bases.push(base);
            weights.push(weight);
        }

        let content: i32 = bases.iter().sum();
        if content <= visible {
            (distribute(visible, &bases, &weights), visible)
        } else {
            (bases, content)
        }
    }

    fn place<'n>(&mut self, node: &'n Node, rect: Rect) -> LayoutNode<'n> {
        let children = match node.kind {
            NodeKind::Text | NodeKind::Spacer => Vec::new(),
            NodeKind::Box => {
                let interior = rect.shrink(node.props.border.thickness());
                node.children
                    .first()
                    .map(|child| vec![self.place(child, interior)])
                    .unwrap_or_default()
            }
            NodeKind::Row => self.place_row(node, rect),
            NodeKind::Column | NodeKind::List | NodeKind::Pane => self.place_stack(node, rect),
        };

        LayoutNode {
            node,
            rect,
            children,
        }
    }

    fn place_row<'n>(&mut self, node: &'n Node, rect: Rect) -> Vec<LayoutNode<'n>> {
        let slots = self.row_slots(node, rect.width);
        let mut x = rect.x;
        let mut children = Vec::with_capacity(slots.len());

        for (child, slot) in node.children.iter().zip(slots) {
            let height = explicit(child.props.height).map_or(rect.height, |h| h.min(rect.height));
            let child_rect = Rect::new(x, rect.y, slot.width, height);
            x += slot.width;
            children.push(self.place(child, child_rect));
        }
        children
    }

    fn place_stack<'n>(&mut self, node: &'n Node, rect: Rect) -> Vec<LayoutNode<'n>> {
        let (heights, content) = self.stack_heights(node, rect.width, rect.height);
        let mut y = rect.y - scroll_offset(&node.props, content, rect.height);
        let mut children = Vec::with_capacity(heights.len());

        for (child, height) in node.children.iter().zip(heights) {
            let width = explicit(child.props.width).map_or(rect.width, |w| w.min(rect.width));
            let child_rect = Rect::new(rect.x, y, width, height);
            y += height;
            children.push(self.place(child, child_rect));
        }
        children
    }
}
