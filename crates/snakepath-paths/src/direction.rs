//! Turning a path into movement.
//!
//! [`next_direction`] is the single-step adapter: the heading from the first
//! path cell to the second. [`Steering`] is for agents that keep moving on
//! their own and only accept turns that are not direct reversals.

use std::fmt;

use snakepath_core::Point;

/// One of the four unit moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// The unit vector of this move (y grows down).
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Self::Up => Point::new(0, -1),
            Self::Down => Point::new(0, 1),
            Self::Left => Point::new(-1, 0),
            Self::Right => Point::new(1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The direction whose unit vector is `d`, if any.
    pub fn from_delta(d: Point) -> Option<Self> {
        match (d.x, d.y) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// The move taking `from` to `to`, if they are 4-adjacent.
    #[inline]
    pub fn between(from: Point, to: Point) -> Option<Self> {
        Self::from_delta(to - from)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Heading for the first step of `path`: `path[1] - path[0]`.
///
/// `None` for paths shorter than two cells (already at the goal) or whose
/// first two cells are not 4-adjacent.
pub fn next_direction(path: &[Point]) -> Option<Direction> {
    match path {
        [a, b, ..] => Direction::between(*a, *b),
        _ => None,
    }
}

/// Split `path` into straight runs: `(heading, steps)` for each maximal
/// stretch walked without turning.
///
/// Stops at the first pair of cells that are not 4-adjacent.
pub fn segments(path: &[Point]) -> Vec<(Direction, usize)> {
    let mut out: Vec<(Direction, usize)> = Vec::new();
    for w in path.windows(2) {
        let Some(d) = Direction::between(w[0], w[1]) else {
            break;
        };
        match out.last_mut() {
            Some((last, n)) if *last == d => *n += 1,
            _ => out.push((d, 1)),
        }
    }
    out
}

/// Heading of a continuously moving agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steering {
    heading: Direction,
}

impl Steering {
    pub fn new(heading: Direction) -> Self {
        Self { heading }
    }

    #[inline]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Turn toward `want` unless it is the current heading or a direct
    /// reversal. Returns whether the heading changed.
    pub fn turn(&mut self, want: Direction) -> bool {
        if want == self.heading || want.is_opposite(self.heading) {
            return false;
        }
        self.heading = want;
        true
    }

    /// Turn toward the first step of `path` (see [`turn`](Steering::turn))
    /// and return the resulting heading.
    pub fn follow(&mut self, path: &[Point]) -> Direction {
        if let Some(d) = next_direction(path) {
            self.turn(d);
        }
        self.heading
    }

    /// Set the heading unconditionally.
    pub fn set(&mut self, heading: Direction) {
        self.heading = heading;
    }
}
