//! Visual properties shared by nodes and cells.

use bitflags::bitflags;

/// A 256-color palette index.
///
/// Index 0 is reserved to mean "unset": the terminal's own default
/// foreground or background is used and no color attribute is emitted.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color(pub u8);

impl Color {
    /// Unset color (terminal default).
    pub const DEFAULT: Self = Self(0);

    /// Create a color from a palette index.
    #[inline]
    pub const fn indexed(index: u8) -> Self {
        Self(index)
    }

    /// The palette index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Whether this color overrides the terminal default.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }
}

impl From<u8> for Color {
    #[inline]
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_set() {
            write!(f, "Color({})", self.0)
        } else {
            f.write_str("Color(default)")
        }
    }
}

bitflags! {
    /// Text style attributes.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use tessel::Style;
    /// let style = Style::BOLD | Style::UNDERLINE;
    /// assert!(style.contains(Style::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSE = 0b0001_0000;
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Border drawn around a box node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Border {
    /// No border; the box occupies its rectangle without drawing.
    #[default]
    None,
    /// Light box-drawing lines.
    Single,
    /// Doubled box-drawing lines.
    Double,
    /// Rounded corners with light edges.
    Rounded,
}

/// Glyphs used to draw one border kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BorderGlyphs {
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Horizontal edge fill.
    pub horizontal: char,
    /// Vertical edge fill.
    pub vertical: char,
}

impl Border {
    /// Whether this border reserves a cell on every side.
    #[inline]
    pub const fn is_drawn(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Cells reserved on each side of a box with this border.
    #[inline]
    pub const fn thickness(self) -> i32 {
        if self.is_drawn() {
            1
        } else {
            0
        }
    }

    /// The glyph set for this border, or `None` when nothing is drawn.
    pub const fn glyphs(self) -> Option<BorderGlyphs> {
        let (top_left, top_right, bottom_left, bottom_right, horizontal, vertical) = match self {
            Self::None => return None,
            Self::Single => ('┌', '┐', '└', '┘', '─', '│'),
            Self::Double => ('╔', '╗', '╚', '╝', '═', '║'),
            Self::Rounded => ('╭', '╮', '╰', '╯', '─', '│'),
        };
        Some(BorderGlyphs {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            horizontal,
            vertical,
        })
    }
}
