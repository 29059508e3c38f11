use std::collections::VecDeque;

use snakepath_core::{Point, Range};
use snakepath_paths::Direction;

/// The snake's body, tail first and head last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    parts: VecDeque<Point>,
}

impl Snake {
    /// A straight snake of `length` segments (at least one) with its head at
    /// `head`, trailing away from `heading`.
    pub fn new(head: Point, heading: Direction, length: usize) -> Self {
        let back = heading.opposite().delta();
        let parts = (0..length.max(1) as i32)
            .rev()
            .map(|i| head + back * i)
            .collect();
        Self { parts }
    }

    /// Centre a snake in `field`, heading right.
    pub fn centered(field: Range, length: usize) -> Self {
        let head = Point::new(
            field.min.x + field.width() / 2,
            field.min.y + field.height() / 2,
        );
        let mut snake = Self::new(head, Direction::Right, length);
        for p in snake.parts.iter_mut() {
            *p = p.wrap(field);
        }
        snake
    }

    #[inline]
    pub fn head(&self) -> Point {
        self.parts[self.parts.len() - 1]
    }

    #[inline]
    pub fn tail(&self) -> Point {
        self.parts[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.parts.contains(&p)
    }

    /// Whether `p` is 4-adjacent to any segment.
    pub fn touches(&self, p: Point) -> bool {
        self.parts.iter().any(|&s| s.is_adjacent_4(p))
    }

    /// Segments from tail to head.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.parts.iter().copied()
    }

    /// Whether moving the head to `next` runs into the body. The tail cell
    /// is safe unless the snake grows this step, since it moves away.
    pub fn would_bite(&self, next: Point, grow: bool) -> bool {
        self.parts
            .iter()
            .enumerate()
            .any(|(i, &p)| p == next && (i != 0 || grow))
    }

    /// Move the head to `next`, keeping the tail when `grow`.
    pub fn advance(&mut self, next: Point, grow: bool) {
        self.parts.push_back(next);
        if !grow {
            self.parts.pop_front();
        }
    }
}
