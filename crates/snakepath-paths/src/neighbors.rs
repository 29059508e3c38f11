use snakepath_core::Point;

/// Unit offsets of the four cardinal neighbours, in expansion order:
/// left, right, up, down.
pub const CARDINAL: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(0, -1),
    Point::new(0, 1),
];

/// Reusable buffer for neighbour enumeration.
///
/// Keeps one small allocation alive across calls so hot loops do not
/// allocate per expanded node.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(CARDINAL.len()),
        }
    }

    /// Return the 4-connected neighbours of `p` in [`CARDINAL`] order,
    /// keeping only those for which `keep` returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for d in CARDINAL {
            let n = p + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
