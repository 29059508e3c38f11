use std::collections::VecDeque;

use snakepath_core::Point;

use crate::neighbors::Neighbors;
use crate::traits::Pather;

/// Breadth-first shortest path from `from` to `to` with unit step costs.
///
/// Uses the same rules as [`PathFinder::search`](crate::PathFinder::search):
/// 4-connected moves, endpoints always enterable. Returns `None` if either
/// endpoint is out of bounds or `to` is unreachable.
///
/// Exhaustive and uninformed, so it is the reference the A* search is
/// checked against, and a cheap reachability probe for callers.
pub fn bfs_path<P: Pather + ?Sized>(grid: &P, from: Point, to: Point) -> Option<Vec<Point>> {
    let rng = grid.bounds();
    let start = rng.index_of(from)?;
    rng.index_of(to)?;

    let mut parent: Vec<Option<usize>> = vec![None; rng.len()];
    let mut seen = vec![false; rng.len()];
    seen[start] = true;

    let mut queue = VecDeque::from([start]);
    let mut nbuf = Neighbors::new();

    while let Some(ci) = queue.pop_front() {
        let cp = rng.point_at(ci);
        if cp == to {
            let mut path = vec![cp];
            let mut cur = ci;
            while let Some(pi) = parent[cur] {
                path.push(rng.point_at(pi));
                cur = pi;
            }
            path.reverse();
            return Some(path);
        }

        for &np in nbuf.cardinal(cp, |n| rng.contains(n) && (n == to || grid.passable(n))) {
            let Some(ni) = rng.index_of(np) else {
                continue;
            };
            if seen[ni] {
                continue;
            }
            seen[ni] = true;
            parent[ni] = Some(ci);
            queue.push_back(ni);
        }
    }

    None
}

/// Number of cells reachable from `from` (including it) through passable
/// cells. Zero if `from` is out of bounds.
pub fn reachable_count<P: Pather + ?Sized>(grid: &P, from: Point) -> usize {
    let rng = grid.bounds();
    let Some(start) = rng.index_of(from) else {
        return 0;
    };
    let mut seen = vec![false; rng.len()];
    seen[start] = true;
    let mut queue = VecDeque::from([start]);
    let mut nbuf = Neighbors::new();
    let mut count = 0;

    while let Some(ci) = queue.pop_front() {
        count += 1;
        let cp = rng.point_at(ci);
        for &np in nbuf.cardinal(cp, |n| rng.contains(n) && grid.passable(n)) {
            if let Some(ni) = rng.index_of(np) {
                if !seen[ni] {
                    seen[ni] = true;
                    queue.push_back(ni);
                }
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::OccupancyGrid;

    #[test]
    fn straight_corridor() {
        let grid = OccupancyGrid::parse("....").unwrap();
        let path = bfs_path(&grid, Point::new(0, 0), Point::new(3, 0)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Point::new(0, 0));
    }

    #[test]
    fn same_cell() {
        let grid = OccupancyGrid::new(2, 2);
        assert_eq!(
            bfs_path(&grid, Point::new(1, 1), Point::new(1, 1)),
            Some(vec![Point::new(1, 1)])
        );
    }

    #[test]
    fn blocked_and_out_of_bounds() {
        let grid = OccupancyGrid::parse(".#.").unwrap();
        assert_eq!(bfs_path(&grid, Point::new(0, 0), Point::new(2, 0)), None);
        assert_eq!(bfs_path(&grid, Point::new(0, 0), Point::new(3, 0)), None);
    }

    #[test]
    fn reachable_count_stops_at_walls() {
        let grid = OccupancyGrid::parse(
            "
            ..#..
            ..#..
            ",
        )
        .unwrap();
        assert_eq!(reachable_count(&grid, Point::new(0, 0)), 4);
        assert_eq!(reachable_count(&grid, Point::new(9, 9)), 0);
    }
}
