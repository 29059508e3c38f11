use snakepath_core::Point;

/// Euclidean (L2) distance between two points.
///
/// Used both as the step cost and the heuristic of the A* search. For
/// axis-aligned unit steps it is exactly `1.0`.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
