//! The occupancy grid the searches run on.
//!
//! An [`OccupancyGrid`] is a plain owned rectangle of [`Tag`]s. Callers
//! rebuild or refresh it each tick and hand a shared reference to the
//! search; nothing in this crate mutates a grid it is given.

use std::fmt;

use snakepath_core::{Point, Range};

use crate::traits::Pather;

/// What occupies a grid cell.
///
/// `Start` and `Goal` are informational markers a caller may paint before
/// searching. Only `Blocked` affects the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    #[default]
    Free,
    Blocked,
    Start,
    Goal,
}

impl Tag {
    /// The glyph used by [`OccupancyGrid::parse`] and the `Display` impl.
    pub const fn glyph(self) -> char {
        match self {
            Self::Free => '.',
            Self::Blocked => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
        }
    }

    /// Inverse of [`glyph`](Tag::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Free),
            '#' => Some(Self::Blocked),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }
}

/// Errors from building an [`OccupancyGrid`] out of rows or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Row `row` has `len` cells where `expected` were required.
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// A character with no [`Tag`] meaning.
    Unknown { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ragged { row, len, expected } => {
                write!(f, "grid is not rectangular: row {row} has {len} cells, expected {expected}")
            }
            Self::Unknown { ch, pos } => {
                write!(f, "grid contains unknown cell \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A rectangular occupancy map with origin (0, 0).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    tags: Vec<Tag>,
    bounds: Range,
}

impl OccupancyGrid {
    /// Create a grid of the given size with every cell [`Tag::Free`].
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            tags: vec![Tag::Free; bounds.len()],
            bounds,
        }
    }

    /// Build a grid from rows (`rows[y][x]`). Every row must have the same
    /// length.
    pub fn from_rows<R: AsRef<[Tag]>>(rows: &[R]) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, |r| r.as_ref().len());
        let mut tags = Vec::with_capacity(expected * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    len: r.len(),
                    expected,
                });
            }
            tags.extend_from_slice(r);
        }
        Ok(Self {
            tags,
            bounds: Range::sized(expected as i32, rows.len() as i32),
        })
    }

    /// Parse a grid from lines of glyphs (`.` free, `#` blocked, `S` start,
    /// `G` goal). Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (y, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, ch)| {
                    Tag::from_glyph(ch).ok_or(GridError::Unknown {
                        ch,
                        pos: Point::new(x as i32, y as i32),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
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

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The tag at `p`, or `None` outside the grid.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Tag> {
        self.bounds.index_of(p).map(|i| self.tags[i])
    }

    /// Set the tag at `p`. Returns `false` (and does nothing) outside the
    /// grid.
    pub fn set(&mut self, p: Point, tag: Tag) -> bool {
        match self.bounds.index_of(p) {
            Some(i) => {
                self.tags[i] = tag;
                true
            }
            None => false,
        }
    }

    /// Mark every in-bounds point of `cells` as [`Tag::Blocked`].
    pub fn block_all<I: IntoIterator<Item = Point>>(&mut self, cells: I) {
        for p in cells {
            self.set(p, Tag::Blocked);
        }
    }

    /// Reset every cell to [`Tag::Free`], keeping the size.
    pub fn clear(&mut self) {
        self.tags.fill(Tag::Free);
    }

    /// Whether `p` is inside the grid and tagged [`Tag::Blocked`].
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.at(p) == Some(Tag::Blocked)
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.tags.iter().filter(|&&t| t == Tag::Blocked).count()
    }

    /// Render the grid as text with `path` overlaid as `*`, keeping the
    /// first and last path cells as `S` and `G`.
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut out = String::with_capacity((self.width() as usize + 1) * self.height() as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Point::new(x, y);
                let ch = if path.first() == Some(&p) {
                    'S'
                } else if path.last() == Some(&p) {
                    'G'
                } else if path.contains(&p) {
                    '*'
                } else {
                    self.at(p).map_or(' ', Tag::glyph)
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let tag = self.at(Point::new(x, y)).unwrap_or_default();
                write!(f, "{}", tag.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Pather for OccupancyGrid {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn passable(&self, p: Point) -> bool {
        !self.is_blocked(p)
    }
}
