//! Node model: the declarative description of a frame.
//!
//! Applications build a fresh [`Node`] tree every frame and hand it to
//! the layout engine. Nodes are plain data; the only behavior here is
//! construction and decoration.
//!
//! # Example
//!
//! ```
//! use tessel::{Border, Color, Node, Style};
//!
//! let tree = Node::column(vec![
//!     Node::text_styled(" title ", Color(0), Color(2), Style::BOLD),
//!     Node::boxed(Border::Rounded, Node::text("body")),
//!     Node::spacer(),
//!     Node::text("footer").with_key("footer").with_focusable(),
//! ]);
//! assert_eq!(tree.children.len(), 4);
//! ```

mod style;

pub use style::{Border, BorderGlyphs, Color, Style};

/// The closed set of node kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    /// Word-wrapped text. Children are ignored.
    Text,
    /// A bordered container around a single child.
    Box,
    /// Lays children out left to right.
    Row,
    /// Stacks children top to bottom.
    Column,
    /// Vertical stack intended for scrolled item lists.
    List,
    /// Vertical stack intended for scrolled panes.
    Pane,
    /// Empty node that absorbs leftover space.
    Spacer,
}

impl NodeKind {
    /// Whether this kind stacks its children vertically.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Column | Self::List | Self::Pane)
    }
}

/// Per-node properties. Every field defaults to zero/empty.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Props {
    /// Text content (Text nodes only).
    pub text: String,
    /// Explicit width in cells (0 = auto).
    pub width: u16,
    /// Explicit height in cells (0 = auto).
    pub height: u16,
    /// Share of leftover space (0 = fixed).
    pub flex: u16,
    /// Border kind (Box nodes only).
    pub border: Border,
    /// Whether the focus manager should visit this node.
    pub focusable: bool,
    /// Stable identity used for focus continuity.
    pub key: Option<String>,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Style attributes.
    pub style: Style,
    /// Rows scrolled off the top of a vertical container.
    pub scroll_offset: u16,
    /// Keep the last content row aligned with the bottom edge.
    pub scroll_to_bottom: bool,
}

/// A node in the UI tree. Owns its children; order is significant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,
    /// Visual and layout properties.
    pub props: Props,
    /// Child nodes in layout order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node of the given kind with default properties.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Props::default(),
            children: Vec::new(),
        }
    }

    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Text);
        node.props.text = text.into();
        node
    }

    /// A text node with colors and style.
    pub fn text_styled(text: impl Into<String>, fg: Color, bg: Color, style: Style) -> Self {
        Self::text(text).with_fg(fg).with_bg(bg).with_style(style)
    }

    /// A row of children laid out left to right.
    pub fn row(children: Vec<Self>) -> Self {
        Self::new(NodeKind::Row).with_children(children)
    }

    /// A column of children stacked top to bottom.
    pub fn column(children: Vec<Self>) -> Self {
        Self::new(NodeKind::Column).with_children(children)
    }

    /// A scrollable list of items.
    pub fn list(children: Vec<Self>) -> Self {
        Self::new(NodeKind::List).with_children(children)
    }

    /// A scrollable pane.
    pub fn pane(children: Vec<Self>) -> Self {
        Self::new(NodeKind::Pane).with_children(children)
    }

    /// A box with the given border around one child.
    pub fn boxed(border: Border, child: Self) -> Self {
        Self::new(NodeKind::Box).with_border(border).with_child(child)
    }

    /// A spacer with flex weight 1.
    pub fn spacer() -> Self {
        Self::new(NodeKind::Spacer).with_flex(1)
    }

    /// Set the stable key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.props.key = Some(key.into());
        self
    }

    /// Set the flex weight.
    #[must_use]
    pub const fn with_flex(mut self, weight: u16) -> Self {
        self.props.flex = weight;
        self
    }

    /// Set explicit width and height (0 keeps that axis automatic).
    #[must_use]
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.props.width = width;
        self.props.height = height;
        self
    }

    /// Mark the node as focusable.
    #[must_use]
    pub const fn with_focusable(mut self) -> Self {
        self.props.focusable = true;
        self
    }

    /// Set the vertical scroll offset.
    #[must_use]
    pub const fn with_scroll_offset(mut self, offset: u16) -> Self {
        self.props.scroll_offset = offset;
        self
    }

    /// Anchor scrolled content to the bottom edge.
    #[must_use]
    pub const fn with_scroll_to_bottom(mut self) -> Self {
        self.props.scroll_to_bottom = true;
        self
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.props.fg = fg;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.props.bg = bg;
        self
    }

    /// Set the style attributes.
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.props.style = style;
        self
    }

    /// Set the border kind.
    #[must_use]
    pub const fn with_border(mut self, border: Border) -> Self {
        self.props.border = border;
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// The key, if one was set and it is not empty.
    pub fn key(&self) -> Option<&str> {
        self.props.key.as_deref().filter(|k| !k.is_empty())
    }
}
