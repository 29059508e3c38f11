//! The screen [`Grid`] and frame diffing.
//!
//! A model draws into a `Grid` every update; the app loop diffs it against
//! the previous one with [`compute_frame`] and hands only the changed cells
//! to the driver.

use crate::cell::{Cell, Style};
use crate::geom::{Point, Range};

/// A 2D buffer of screen [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Grid {
    /// Create a grid of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Read the cell at `p`. Returns `Cell::default()` outside bounds.
    pub fn at(&self, p: Point) -> Cell {
        self.bounds
            .index_of(p)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    /// Set the cell at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.bounds.index_of(p) {
            self.cells[i] = cell;
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `text` starting at `at`, clipped to the row. Returns the number
    /// of cells written.
    pub fn draw_text(&mut self, at: Point, text: &str, style: Style) -> usize {
        let mut n = 0;
        for (i, ch) in text.chars().enumerate() {
            let p = at.shift(i as i32, 0);
            if !self.bounds.contains(p) {
                break;
            }
            self.set(p, Cell::new(ch, style));
            n += 1;
        }
        n
    }

    /// Replace the contents with `src`, resizing if needed.
    pub fn copy_from(&mut self, src: &Grid) {
        self.bounds = src.bounds;
        self.cells.clone_from(&src.cells);
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the cells of `curr` that differ from `prev`.
///
/// When the sizes differ every cell of `curr` is part of the frame.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let full = prev.bounds() != curr.bounds();
    let cells = curr
        .iter()
        .filter(|&(p, c)| full || prev.at(p) != c)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}
