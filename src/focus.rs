//! Focus tracking over a laid-out tree.
//!
//! Focusable nodes are identified by their key, never by position, so
//! focus survives tree rebuilds as long as the focused key is still
//! present. Nodes marked focusable without a key are skipped.

use crate::layout::LayoutNode;

#[derive(Debug, Clone, Default)]
struct Context {
    keys: Vec<String>,
    current: usize,
}

/// Ordered focus ring with a stack of nested contexts.
///
/// A context is the focus ring of one subtree, such as a modal or a
/// pane. Pushing a context scopes Tab cycling to that subtree; popping
/// restores the outer ring and its position.
#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    active: Context,
    stack: Vec<Context>,
}

impl FocusManager {
    /// Create a manager with no focusable nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ring from `tree`, keeping the current key if it
    /// still exists and otherwise focusing the first node.
    pub fn update(&mut self, tree: &LayoutNode<'_>) {
        let previous = self.current().map(str::to_owned);
        self.active.keys = collect(tree);
        self.active.current = previous
            .and_then(|key| self.active.keys.iter().position(|k| *k == key))
            .unwrap_or(0);
    }

    /// Key of the focused node, if any.
    pub fn current(&self) -> Option<&str> {
        self.active.keys.get(self.active.current).map(String::as_str)
    }

    /// Whether `key` holds focus.
    pub fn is_focused(&self, key: &str) -> bool {
        self.current() == Some(key)
    }

    /// Move focus forward, wrapping at the end.
    pub fn next(&mut self) {
        let len = self.active.keys.len();
        if len > 0 {
            self.active.current = (self.active.current + 1) % len;
        }
    }

    /// Move focus backward, wrapping at the start.
    pub fn prev(&mut self) {
        let len = self.active.keys.len();
        if len > 0 {
            self.active.current = (self.active.current + len - 1) % len;
        }
    }

    /// Save the current ring and focus the first node of `tree`.
    pub fn push_context(&mut self, tree: &LayoutNode<'_>) {
        let inner = Context {
            keys: collect(tree),
            current: 0,
        };
        self.stack.push(std::mem::replace(&mut self.active, inner));
    }

    /// Restore the ring saved by the matching [`push_context`](Self::push_context).
    ///
    /// Does nothing at the outermost context.
    pub fn pop_context(&mut self) {
        if let Some(outer) = self.stack.pop() {
            self.active = outer;
        }
    }

    /// Number of nodes in the active ring.
    pub fn focusable_count(&self) -> usize {
        self.active.keys.len()
    }

    /// Depth of nested contexts above the outermost one.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

fn collect(tree: &LayoutNode<'_>) -> Vec<String> {
    tree.iter()
        .filter(|layout| layout.node.props.focusable)
        .filter_map(|layout| layout.node.key().map(str::to_owned))
        .collect()
}
