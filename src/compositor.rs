//! Compositor: the per-frame pipeline and its only cross-frame state.
//!
//! A frame is layout, paint, diff and render run back to back on one
//! node tree. The buffer painted by the last successfully written frame
//! is kept as the baseline for the next diff; nothing else survives
//! between frames.

use crate::buffer::{diff, Buffer};
use crate::layout::layout;
use crate::node::Node;
use crate::paint::paint;
use crate::terminal::{encode, OutputBuffer};
use std::io::{self, Write};

/// Counters for one composed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Changed-cell runs emitted.
    pub runs: usize,
    /// Cells covered by those runs.
    pub cells: usize,
    /// Bytes of escape-sequence output.
    pub bytes: usize,
    /// Whether every row was redrawn.
    pub full_redraw: bool,
}

/// The result of composing one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The freshly painted buffer.
    pub buffer: Buffer,
    /// Bytes that move the screen from the previous buffer to `buffer`.
    pub output: Vec<u8>,
    /// Frame counters.
    pub stats: FrameStats,
}

/// Run the full pipeline for `root` at the given size.
///
/// With no `previous` buffer, or one of a different size, every row is
/// redrawn. This is a pure function of its inputs.
pub fn compose(previous: Option<&Buffer>, root: &Node, width: u16, height: u16) -> Frame {
    let tree = layout(root, i32::from(width), i32::from(height));
    let mut buffer = Buffer::new(width, height);
    paint(&mut buffer, &tree);

    let full_redraw =
        previous.map_or(true, |prev| prev.width() != width || prev.height() != height);
    let changes = match previous {
        Some(prev) if !full_redraw => diff::diff(prev, &buffer),
        _ => diff::full_redraw(&buffer),
    };

    let mut out = OutputBuffer::new();
    if !changes.is_empty() {
        encode(&mut out, &changes);
    }

    let stats = FrameStats {
        runs: changes.len(),
        cells: changes.iter().map(diff::Change::len).sum(),
        bytes: out.len(),
        full_redraw,
    };

    Frame {
        buffer,
        output: out.take(),
        stats,
    }
}

/// Owns the previous frame's buffer and drives frames into a sink.
#[derive(Debug, Default)]
pub struct Compositor {
    previous: Option<Buffer>,
    frames: u64,
}

impl Compositor {
    /// Create a compositor whose first frame redraws everything.
    pub const fn new() -> Self {
        Self {
            previous: None,
            frames: 0,
        }
    }

    /// The buffer currently believed to be on screen.
    pub const fn previous(&self) -> Option<&Buffer> {
        self.previous.as_ref()
    }

    /// Frames successfully written so far.
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Forget the on-screen state so the next frame redraws every row.
    pub fn invalidate(&mut self) {
        tracing::debug!("compositor invalidated");
        self.previous = None;
    }

    /// Compose a frame for `root` and write it to `sink`.
    ///
    /// The previous buffer is replaced only after the sink accepted all
    /// bytes, so a failed write is retried in full by the next frame.
    ///
    /// # Errors
    ///
    /// Returns any error reported by `sink`.
    pub fn frame<W: Write>(
        &mut self,
        root: &Node,
        width: u16,
        height: u16,
        sink: &mut W,
    ) -> io::Result<FrameStats> {
        let Frame {
            buffer,
            output,
            stats,
        } = compose(self.previous.as_ref(), root, width, height);

        if !output.is_empty() {
            sink.write_all(&output)?;
            sink.flush()?;
        }

        self.previous = Some(buffer);
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            runs = stats.runs,
            cells = stats.cells,
            bytes = stats.bytes,
            full_redraw = stats.full_redraw,
            "frame written"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;
    use crate::node::Border;

    fn screen(text: &str) -> Node {
        Node::column(vec![Node::text(text), Node::spacer(), Node::text("status")])
    }

    #[test]
    fn test_first_frame_redraws_every_row() {
        let frame = compose(None, &screen("hello"), 8, 3);
        assert!(frame.stats.full_redraw);
        assert_eq!(frame.stats.runs, 3);
        assert_eq!(frame.stats.cells, 24);
        assert_eq!(frame.stats.bytes, frame.output.len());
        assert_eq!(frame.buffer.row_text(0), "hello   ");
        assert_eq!(frame.buffer.row_text(2), "status  ");
    }

    #[test]
    fn test_identical_frame_emits_nothing() {
        let first = compose(None, &screen("hello"), 8, 3);
        let second = compose(Some(&first.buffer), &screen("hello"), 8, 3);
        assert!(second.output.is_empty());
        assert_eq!(second.stats, FrameStats::default());
    }

    #[test]
    fn test_small_edit_emits_one_run() {
        let first = compose(None, &screen("hello"), 8, 3);
        let second = compose(Some(&first.buffer), &screen("help!"), 8, 3);
        assert_eq!(second.stats.runs, 1);
        assert_eq!(second.stats.cells, 2);
        assert_eq!(second.output, b"\x1b[1;4Hp!".to_vec());
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let first = compose(None, &screen("hello"), 8, 3);
        let second = compose(Some(&first.buffer), &screen("hello"), 10, 3);
        assert!(second.stats.full_redraw);
        assert_eq!(second.stats.runs, 3);
    }

    #[test]
    fn test_compositor_tracks_previous() {
        let mut compositor = Compositor::new();
        let mut sink = Vec::new();

        let stats = compositor.frame(&screen("one"), 6, 2, &mut sink).unwrap();
        assert!(stats.full_redraw);
        assert_eq!(compositor.frame_count(), 1);

        sink.clear();
        let stats = compositor.frame(&screen("one"), 6, 2, &mut sink).unwrap();
        assert_eq!(stats.runs, 0);
        assert!(sink.is_empty());
        assert_eq!(compositor.previous().map(|b| b.row_text(0)), Some("one   ".to_string()));
    }

    #[test]
    fn test_invalidate_redraws_next_frame() {
        let mut compositor = Compositor::new();
        let mut sink = Vec::new();
        compositor.frame(&screen("x"), 4, 2, &mut sink).unwrap();

        compositor.invalidate();
        assert!(compositor.previous().is_none());
        let stats = compositor.frame(&screen("x"), 4, 2, &mut sink).unwrap();
        assert!(stats.full_redraw);
    }

    #[test]
    fn test_failed_write_keeps_previous_buffer() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut compositor = Compositor::new();
        let mut sink = Vec::new();
        compositor.frame(&screen("a"), 4, 2, &mut sink).unwrap();

        assert!(compositor.frame(&screen("b"), 4, 2, &mut Broken).is_err());
        assert_eq!(compositor.previous().map(|b| b.cell(0, 0)), Some(Cell::new('a')));
        assert_eq!(compositor.frame_count(), 1);

        sink.clear();
        let stats = compositor.frame(&screen("b"), 4, 2, &mut sink).unwrap();
        assert_eq!(stats.runs, 1);
        assert_eq!(sink, b"\x1b[1;1Hb".to_vec());
    }

    #[test]
    fn test_zero_size_frame() {
        let frame = compose(None, &Node::boxed(Border::Single, Node::text("x")), 0, 0);
        assert!(frame.output.is_empty());
        assert_eq!(frame.stats.runs, 0);
    }
}
