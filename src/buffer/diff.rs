//! Diffing Engine: Find the minimal set of changed cell runs.
//!
//! Two buffers of equal size are compared row by row. Every maximal
//! horizontal run of differing cells becomes one [`Change`] carrying
//! the new cells. Runs never cross a row boundary and come out in
//! row-major order, ascending by column within a row.
//!
//! Buffers of different sizes cannot be compared cell for cell; the
//! result is then a forced full redraw with one run per row.

use super::{Buffer, Cell};

/// A horizontal run of changed cells.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Change {
    /// Starting column (0-indexed).
    pub x: u16,
    /// Row (0-indexed).
    pub y: u16,
    /// New cells for columns `x..x + cells.len()`.
    pub cells: Vec<Cell>,
}

impl Change {
    /// Number of cells in the run.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the run is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Compare `previous` against `next` and return the changed runs.
///
/// On a dimension mismatch every row of `next` is returned as one run.
pub fn diff(previous: &Buffer, next: &Buffer) -> Vec<Change> {
    if previous.width() != next.width() || previous.height() != next.height() {
        return full_redraw(next);
    }

    let mut changes = Vec::new();
    for y in 0..next.height() {
        diff_row(previous.row(y), next.row(y), y, &mut changes);
    }
    changes
}

/// Every row of `buffer` as one run.
pub fn full_redraw(buffer: &Buffer) -> Vec<Change> {
    if buffer.width() == 0 {
        return Vec::new();
    }
    (0..buffer.height())
        .map(|y| Change {
            x: 0,
            y,
            cells: buffer.row(y).to_vec(),
        })
        .collect()
}

fn diff_row(previous: &[Cell], next: &[Cell], y: u16, changes: &mut Vec<Change>) {
    let mut run: Option<Change> = None;

    for (x, (old, new)) in (0u16..).zip(previous.iter().zip(next)) {
        if old == new {
            // A matching cell closes the open run.
            if let Some(change) = run.take() {
                changes.push(change);
            }
            continue;
        }

        run.get_or_insert_with(|| Change {
            x,
            y,
            cells: Vec::new(),
        })
        .cells
        .push(*new);
    }

    if let Some(change) = run {
        changes.push(change);
    }
}
