//! Cell: The atomic unit of terminal display.
//!
//! A cell is one character position: a single code point plus the pen
//! (foreground, background, style) it is drawn with. Cells compare
//! structurally; equality is the unit of change detection.

use crate::node::{Color, Style};

/// The drawing attributes of a cell, without its glyph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Pen {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Style attributes.
    pub style: Style,
}

impl Pen {
    /// The terminal's default pen: no colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: Color::DEFAULT,
        bg: Color::DEFAULT,
        style: Style::empty(),
    };

    /// Create a pen.
    #[inline]
    pub const fn new(fg: Color, bg: Color, style: Style) -> Self {
        Self { fg, bg, style }
    }

    /// Whether this pen needs no attribute codes at all.
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The displayed code point.
    ch: char,
    /// Foreground, background and style.
    pen: Pen,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space character with default colors).
    pub const EMPTY: Self = Self {
        ch: ' ',
        pen: Pen::DEFAULT,
    };

    /// Create a cell with default colors.
    #[inline]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            pen: Pen::DEFAULT,
        }
    }

    /// Create a cell drawn with the given pen.
    #[inline]
    pub const fn with_pen(ch: char, pen: Pen) -> Self {
        Self { ch, pen }
    }

    /// A space carrying only a background color.
    #[inline]
    pub const fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            pen: Pen::new(Color::DEFAULT, bg, Style::empty()),
        }
    }

    /// Get the glyph.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// Get the pen.
    #[inline]
    pub const fn pen(&self) -> Pen {
        self.pen
    }

    /// Get the foreground color.
    #[inline]
    pub const fn fg(&self) -> Color {
        self.pen.fg
    }

    /// Get the background color.
    #[inline]
    pub const fn bg(&self) -> Color {
        self.pen.bg
    }

    /// Get the style attributes.
    #[inline]
    pub const fn style(&self) -> Style {
        self.pen.style
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.pen.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.pen.bg = bg;
        self
    }

    /// Set the style attributes (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.pen.style = style;
        self
    }

    /// Reset the cell to empty (space with default colors).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.pen.fg)
            .field("bg", &self.pen.bg)
            .field("style", &self.pen.style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_is_space() {
        assert_eq!(Cell::EMPTY.ch(), ' ');
        assert_eq!(Cell::default(), Cell::EMPTY);
        assert!(Cell::EMPTY.pen().is_default());
    }

    #[test]
    fn test_cell_equality_is_structural() {
        let a = Cell::new('A').with_fg(Color(1));
        let b = Cell::new('A').with_fg(Color(1));
        let c = Cell::new('A').with_fg(Color(2));
        let d = Cell::new('A').with_fg(Color(1)).with_style(Style::BOLD);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Color(196))
            .with_bg(Color(21))
            .with_style(Style::BOLD | Style::ITALIC);

        assert_eq!(cell.fg(), Color(196));
        assert_eq!(cell.bg(), Color(21));
        assert!(cell.style().contains(Style::BOLD));
        assert!(cell.style().contains(Style::ITALIC));
    }

    #[test]
    fn test_blank_carries_background() {
        let cell = Cell::blank(Color(4));
        assert_eq!(cell.ch(), ' ');
        assert_eq!(cell.bg(), Color(4));
        assert_ne!(cell, Cell::EMPTY);
    }

    #[test]
    fn test_non_ascii_glyph() {
        let cell = Cell::new('╭');
        assert_eq!(cell.ch(), '╭');
    }

    #[test]
    fn test_cell_reset() {
        let mut cell = Cell::new('X').with_fg(Color(9));
        cell.reset();
        assert_eq!(cell, Cell::EMPTY);
    }
}
