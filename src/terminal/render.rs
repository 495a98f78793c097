//! Escape-sequence renderer: turn change runs into terminal bytes.
//!
//! Each run starts with an absolute cursor move. The pen is tracked
//! across the whole call, starting from the terminal default, and an
//! SGR sequence is only emitted when the next glyph's pen differs from
//! the last one emitted. If any SGR went out, one trailing reset closes
//! the output so attributes never leak past the frame.

use super::output::OutputBuffer;
use crate::buffer::{Change, Pen};
use std::io::{self, Write};

/// Bytes reserved per changed cell when sizing the output buffer.
const BYTES_PER_CELL: usize = 4;
/// Bytes reserved per run for the cursor move.
const BYTES_PER_RUN: usize = 12;

/// Append the encoding of `changes` to `out`.
///
/// Returns `true` if any SGR sequence was emitted.
pub fn encode(out: &mut OutputBuffer, changes: &[Change]) -> bool {
    let mut pen = Pen::DEFAULT;
    let mut styled = false;

    for change in changes {
        out.cursor_move(change.x, change.y);
        for cell in &change.cells {
            if cell.pen() != pen {
                pen = cell.pen();
                out.set_pen(pen);
                styled = true;
            }
            out.write_char(cell.ch());
        }
    }

    if styled {
        out.reset_attrs();
    }
    styled
}

/// Write the escape-sequence encoding of `changes` to `sink`.
///
/// The whole encoding is built in memory first and handed to the sink
/// in a single `write_all`. An empty change set writes nothing.
///
/// # Errors
///
/// Returns any error reported by `sink`.
pub fn render<W: Write>(sink: &mut W, changes: &[Change]) -> io::Result<()> {
    if changes.is_empty() {
        return Ok(());
    }

    let cells: usize = changes.iter().map(Change::len).sum();
    let mut out =
        OutputBuffer::with_capacity(cells * BYTES_PER_CELL + changes.len() * BYTES_PER_RUN);
    encode(&mut out, changes);
    out.flush_to(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;
    use crate::node::{Color, Style};

    fn rendered(changes: &[Change]) -> String {
        let mut sink = Vec::new();
        render(&mut sink, changes).unwrap();
        String::from_utf8(sink).unwrap()
    }

    #[test]
    fn test_render_single_change() {
        let changes = [Change {
            x: 2,
            y: 3,
            cells: vec![Cell::new('A')],
        }];
        assert_eq!(rendered(&changes), "\x1b[4;3HA");
    }

    #[test]
    fn test_render_style_change() {
        let bold_red = Cell::new('A').with_fg(Color(1)).with_style(Style::BOLD);
        let changes = [Change {
            x: 0,
            y: 0,
            cells: vec![
                bold_red,
                Cell::new('B').with_fg(Color(1)).with_style(Style::BOLD),
                Cell::new('C').with_fg(Color(2)),
            ],
        }];
        let out = rendered(&changes);

        assert!(out.contains(";1;38;5;1m"), "{out:?}");
        assert!(out.contains(";38;5;2m"), "{out:?}");
        // Two transitions plus the trailing reset.
        assert_eq!(out.matches("\x1b[0").count(), 3, "{out:?}");
        assert_eq!(out, "\x1b[1;1H\x1b[0;1;38;5;1mAB\x1b[0;38;5;2mC\x1b[0m");
    }

    #[test]
    fn test_render_no_changes_writes_nothing() {
        assert!(rendered(&[]).is_empty());
    }

    #[test]
    fn test_default_pen_emits_no_sgr() {
        let changes = [
            Change {
                x: 0,
                y: 0,
                cells: vec![Cell::new('a'), Cell::new('b')],
            },
            Change {
                x: 4,
                y: 1,
                cells: vec![Cell::new('c')],
            },
        ];
        assert_eq!(rendered(&changes), "\x1b[1;1Hab\x1b[2;5Hc");
    }

    #[test]
    fn test_pen_carries_across_runs() {
        let blue = Cell::new('x').with_bg(Color(4));
        let changes = [
            Change {
                x: 0,
                y: 0,
                cells: vec![blue],
            },
            Change {
                x: 0,
                y: 2,
                cells: vec![blue, Cell::new('y')],
            },
        ];
        assert_eq!(
            rendered(&changes),
            "\x1b[1;1H\x1b[0;48;5;4mx\x1b[3;1Hx\x1b[0my\x1b[0m"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let changes = [Change {
            x: 1,
            y: 1,
            cells: vec![Cell::new('┌').with_fg(Color(7)), Cell::new('─'), Cell::new('┐')],
        }];
        assert_eq!(rendered(&changes), rendered(&changes));
    }

    #[test]
    fn test_encode_reports_styling() {
        let mut out = OutputBuffer::new();
        let plain = [Change {
            x: 0,
            y: 0,
            cells: vec![Cell::new('p')],
        }];
        assert!(!encode(&mut out, &plain));

        let styled = [Change {
            x: 0,
            y: 0,
            cells: vec![Cell::new('s').with_style(Style::ITALIC)],
        }];
        out.clear();
        assert!(encode(&mut out, &styled));
        assert!(out.as_bytes().ends_with(b"\x1b[0m"));
    }

    #[test]
    fn test_render_propagates_sink_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let changes = [Change {
            x: 0,
            y: 0,
            cells: vec![Cell::new('z')],
        }];
        let err = render(&mut Broken, &changes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
