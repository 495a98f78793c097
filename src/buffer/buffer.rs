//! Buffer: A grid of cells representing the terminal screen.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::{Cell, Pen};
use super::diff::Change;
use crate::layout::Rect;

/// A grid of cells representing the terminal screen.
///
/// The buffer stores cells in a contiguous `Vec` for cache efficiency.
/// Access is in row-major order: `index = y * width + x`.
///
/// Coordinates are signed so callers can pass positions computed from
/// overflowing layouts. Writes outside the grid are ignored and reads
/// outside the grid yield [`Cell::EMPTY`]; nothing here panics.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to empty (space with default colors).
    /// Zero-sized buffers are allowed and hold no cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle at the origin.
    #[inline]
    pub fn area(&self) -> Rect {
        Rect::from_size(i32::from(self.width), i32::from(self.height))
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let width = usize::from(self.width);
        if x < width && y < usize::from(self.height) {
            Some(y * width + x)
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Read the cell at (x, y), or [`Cell::EMPTY`] when out of bounds.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.get(x, y).copied().unwrap_or(Cell::EMPTY)
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Write a string left to right starting at (x, y).
    ///
    /// One code point per cell; stops at the right edge without
    /// wrapping. Returns the number of cells written.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, pen: Pen) -> usize {
        let mut written = 0;
        let mut col = x;
        for ch in text.chars() {
            if col >= i32::from(self.width) {
                break;
            }
            if self.set(col, y, Cell::with_pen(ch, pen)) {
                written += 1;
            }
            col += 1;
        }
        written
    }

    /// Fill a rectangular region with a cell, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let area = rect.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Clear the entire buffer (fill with empty cells).
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Get one row of cells, or an empty slice when out of bounds.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let width = usize::from(self.width);
        let start = usize::from(y) * width;
        &self.cells[start..start + width]
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// The glyphs of one row as a string.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(Cell::ch).collect()
    }

    /// Write a set of change runs into this buffer.
    ///
    /// Applying `diff(a, b)` to a copy of `a` reproduces `b`.
    pub fn apply(&mut self, changes: &[Change]) {
        for change in changes {
            let y = i32::from(change.y);
            for (offset, cell) in (i32::from(change.x)..).zip(&change.cells) {
                self.set(offset, y, *cell);
            }
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = (0..self.height).map(|y| self.row_text(y)).collect();
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rows", &rows)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Color, Style};

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.len(), 80 * 24);
        assert!(buffer.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn test_buffer_zero_size() {
        let buffer = Buffer::new(0, 24);
        assert!(buffer.is_empty());
        assert_eq!(buffer.cell(0, 0), Cell::EMPTY);
        assert_eq!(buffer.rows().count(), 24);
        assert!(buffer.row(3).is_empty());
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buffer = Buffer::new(5, 5);
        let cell = Cell::new('X').with_fg(Color(1)).with_bg(Color(2));
        assert!(buffer.set(2, 3, cell));
        assert_eq!(buffer.get(2, 3), Some(&cell));
        assert_eq!(buffer.cell(2, 3), cell);
    }

    #[test]
    fn test_buffer_out_of_bounds() {
        let mut buffer = Buffer::new(3, 3);
        assert!(!buffer.set(-1, 0, Cell::new('X')));
        assert!(!buffer.set(3, 0, Cell::new('X')));
        assert!(!buffer.set(0, i32::MAX, Cell::new('X')));
        assert!(buffer.get(-1, 0).is_none());
        assert_eq!(buffer.cell(-1, 0), Cell::EMPTY);
        assert_eq!(buffer.cell(7, 7), Cell::EMPTY);
        assert!(buffer.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn test_buffer_index() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.index_of(5, 10), Some(10 * 80 + 5));
        assert_eq!(buffer.index_of(80, 0), None);
        assert_eq!(buffer.index_of(0, -1), None);
    }

    #[test]
    fn test_put_str() {
        let mut buffer = Buffer::new(10, 1);
        let pen = Pen::new(Color(1), Color::DEFAULT, Style::empty());
        assert_eq!(buffer.put_str(2, 0, "hi", pen), 2);
        assert_eq!(buffer.cell(2, 0).ch(), 'h');
        assert_eq!(buffer.cell(3, 0).ch(), 'i');
        assert_eq!(buffer.cell(3, 0).fg(), Color(1));
        assert_eq!(buffer.cell(4, 0), Cell::EMPTY);
    }

    #[test]
    fn test_put_str_clips_at_right_edge() {
        let mut buffer = Buffer::new(3, 1);
        assert_eq!(buffer.put_str(1, 0, "abcdef", Pen::DEFAULT), 2);
        assert_eq!(buffer.row_text(0), " ab");
    }

    #[test]
    fn test_put_str_from_negative_column() {
        let mut buffer = Buffer::new(4, 1);
        assert_eq!(buffer.put_str(-2, 0, "abcd", Pen::DEFAULT), 2);
        assert_eq!(buffer.row_text(0), "cd  ");
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buffer = Buffer::new(4, 3);
        buffer.fill_rect(Rect::new(2, 1, 10, 10), Cell::new('#'));
        assert_eq!(buffer.row_text(0), "    ");
        assert_eq!(buffer.row_text(1), "  ##");
        assert_eq!(buffer.row_text(2), "  ##");
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = Buffer::new(3, 3);
        buffer.set(1, 1, Cell::new('Z').with_fg(Color(5)));
        buffer.clear();
        assert_eq!(buffer.cell(1, 1), Cell::EMPTY);
    }

    #[test]
    fn test_apply_changes() {
        let mut buffer = Buffer::new(5, 2);
        let changes = vec![Change {
            x: 3,
            y: 1,
            cells: vec![Cell::new('a'), Cell::new('b'), Cell::new('c')],
        }];
        buffer.apply(&changes);
        assert_eq!(buffer.row_text(1), "   ab");
    }
}
