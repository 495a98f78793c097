//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::buffer::Pen;
use crate::node::Style;
use std::io::Write;

/// SGR attribute codes, in emission order.
const STYLE_CODES: [(Style, &[u8]); 5] = [
    (Style::BOLD, b";1"),
    (Style::DIM, b";2"),
    (Style::ITALIC, b";3"),
    (Style::UNDERLINE, b";4"),
    (Style::REVERSE, b";7"),
];

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the accumulated bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write one glyph as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        self.data.extend_from_slice(b"\x1b[");
        self.write_number(u32::from(y) + 1);
        self.data.push(b';');
        self.write_number(u32::from(x) + 1);
        self.data.push(b'H');
    }

    /// Reset all attributes, then set everything `pen` carries.
    ///
    /// Always starts with `0` so no attribute of a previous pen leaks.
    pub fn set_pen(&mut self, pen: Pen) {
        self.data.extend_from_slice(b"\x1b[0");
        for (flag, code) in STYLE_CODES {
            if pen.style.contains(flag) {
                self.data.extend_from_slice(code);
            }
        }
        if pen.fg.is_set() {
            self.data.extend_from_slice(b";38;5;");
            self.write_number(u32::from(pen.fg.index()));
        }
        if pen.bg.is_set() {
            self.data.extend_from_slice(b";48;5;");
            self.write_number(u32::from(pen.bg.index()));
        }
        self.data.push(b'm');
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }

    fn write_number(&mut self, mut value: u32) {
        let mut digits = [0u8; 10];
        let mut start = digits.len();
        loop {
            start -= 1;
            // value % 10 < 10, so the cast is lossless.
            #[allow(clippy::cast_possible_truncation)]
            let digit = (value % 10) as u8;
            digits[start] = b'0' + digit;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        self.data.extend_from_slice(&digits[start..]);
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;

    fn text(out: &OutputBuffer) -> &str {
        std::str::from_utf8(out.as_bytes()).unwrap()
    }

    #[test]
    fn test_cursor_move_is_one_based() {
        let mut out = OutputBuffer::new();
        out.cursor_move(0, 0);
        out.cursor_move(2, 3);
        out.cursor_move(119, 999);
        assert_eq!(text(&out), "\x1b[1;1H\x1b[4;3H\x1b[1000;120H");
    }

    #[test]
    fn test_set_pen_default_is_bare_reset() {
        let mut out = OutputBuffer::new();
        out.set_pen(Pen::DEFAULT);
        assert_eq!(text(&out), "\x1b[0m");
    }

    #[test]
    fn test_set_pen_orders_attributes() {
        let mut out = OutputBuffer::new();
        let style = Style::REVERSE | Style::BOLD | Style::UNDERLINE | Style::DIM | Style::ITALIC;
        out.set_pen(Pen::new(Color(196), Color(21), style));
        assert_eq!(text(&out), "\x1b[0;1;2;3;4;7;38;5;196;48;5;21m");
    }

    #[test]
    fn test_set_pen_background_only() {
        let mut out = OutputBuffer::new();
        out.set_pen(Pen::new(Color::DEFAULT, Color(255), Style::empty()));
        assert_eq!(text(&out), "\x1b[0;48;5;255m");
    }

    #[test]
    fn test_write_char_utf8() {
        let mut out = OutputBuffer::new();
        out.write_char('a');
        out.write_char('╭');
        assert_eq!(text(&out), "a╭");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_take_and_clear() {
        let mut out = OutputBuffer::new();
        out.reset_attrs();
        assert_eq!(out.take(), b"\x1b[0m".to_vec());
        assert!(out.is_empty());
        out.write_raw(b"xyz");
        out.clear();
        assert!(out.is_empty());
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.write_raw(b"hello");
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");
    }
}
