use std::collections::BinaryHeap;
use std::fmt;

use snakepath_core::{Point, Range};

use crate::distance::euclidean;
use crate::neighbors::Neighbors;
use crate::node::{FrontierEntry, NodeArena, NodeState};
use crate::traits::Pather;

/// Which end of a search a coordinate was passed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Goal => "goal",
        })
    }
}

/// Why a search could not run to completion.
///
/// An unreachable goal is not an error: it is `Ok(None)` from
/// [`PathFinder::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// `pos` lies outside `bounds`.
    InvalidInput {
        endpoint: Endpoint,
        pos: Point,
        bounds: Range,
    },
    /// The configured expansion budget ran out before the frontier did.
    BudgetExhausted { expanded: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput {
                endpoint,
                pos,
                bounds,
            } => write!(f, "{endpoint} {pos} is outside grid bounds {bounds}"),
            Self::BudgetExhausted { expanded } => {
                write!(f, "search gave up after expanding {expanded} nodes")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Limits applied to a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of nodes to finalize. `None` means unbounded.
    pub max_expansions: Option<usize>,
}

/// Best-first (A*) shortest-path search over a 4-connected grid.
///
/// Step cost and heuristic are both Euclidean distance. Finalized cells are
/// never reopened, which is exact here because every step costs `1.0`.
///
/// A `PathFinder` holds configuration only; every call to
/// [`search`](PathFinder::search) builds and drops its own frontier, visited
/// set and node arena.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    limits: SearchLimits,
}

impl PathFinder {
    /// A path finder with no expansion budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// A path finder that gives up after `limits`.
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Find a shortest 4-connected path from `start` to `goal`.
    ///
    /// Returns the full path including both endpoints, `Ok(None)` when the
    /// goal is unreachable, or an error when an endpoint is out of bounds or
    /// the budget runs out. `start` and `goal` are always enterable, even if
    /// the grid marks them blocked.
    ///
    /// Among equally short paths the frontier prefers the lowest `g + h`,
    /// then the lowest `h`, then the lowest `x`, then the lowest `y`, so the
    /// result is deterministic for a given grid.
    pub fn search<P: Pather + ?Sized>(
        &self,
        start: Point,
        goal: Point,
        grid: &P,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        let bounds = grid.bounds();
        check_bounds(Endpoint::Start, start, bounds)?;
        check_bounds(Endpoint::Goal, goal, bounds)?;

        if start == goal {
            return Ok(Some(vec![start]));
        }

        let mut arena = NodeArena::new(bounds);
        let mut open: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let root = arena.insert(start, 0.0, euclidean(start, goal), None);
        open.push(FrontierEntry::of(root, arena.get(root)));

        let mut nbuf = Neighbors::new();
        let mut expanded = 0usize;

        while let Some(current) = open.pop() {
            let node = arena.get(current.node);
            // Closed, or superseded by a cheaper entry pushed later.
            if node.state == NodeState::Closed || node.g != current.g {
                continue;
            }

            if current.pos == goal {
                let path = arena.path_to(current.node);
                log::debug!(
                    "astar {start} -> {goal}: {} cells, {expanded} expanded, {} discovered",
                    path.len(),
                    arena.len()
                );
                return Ok(Some(path));
            }

            if let Some(max) = self.limits.max_expansions {
                if expanded >= max {
                    log::trace!("astar {start} -> {goal}: budget of {max} expansions hit");
                    return Err(SearchError::BudgetExhausted { expanded });
                }
            }

            arena.get_mut(current.node).state = NodeState::Closed;
            expanded += 1;

            let cur_pos = current.pos;
            let cur_g = current.g;
            let nbs = nbuf.cardinal(cur_pos, |n| {
                bounds.contains(n) && (n == goal || grid.passable(n))
            });

            for &np in nbs {
                let g = cur_g + euclidean(cur_pos, np);
                match arena.lookup(np) {
                    None => {
                        let id = arena.insert(np, g, euclidean(np, goal), Some(current.node));
                        open.push(FrontierEntry::of(id, arena.get(id)));
                    }
                    Some(id) => {
                        let n = arena.get_mut(id);
                        if n.state == NodeState::Closed || g >= n.g {
                            continue;
                        }
                        n.g = g;
                        n.parent = current.node;
                        open.push(FrontierEntry::of(id, n));
                    }
                }
            }
        }

        log::debug!("astar {start} -> {goal}: unreachable, {expanded} expanded");
        Ok(None)
    }
}

/// Shorthand for [`PathFinder::new`]`.search(..)`.
pub fn search<P: Pather + ?Sized>(
    start: Point,
    goal: Point,
    grid: &P,
) -> Result<Option<Vec<Point>>, SearchError> {
    PathFinder::new().search(start, goal, grid)
}

fn check_bounds(endpoint: Endpoint, pos: Point, bounds: Range) -> Result<(), SearchError> {
    if bounds.contains(pos) {
        Ok(())
    } else {
        Err(SearchError::InvalidInput {
            endpoint,
            pos,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::bfs_path;
    use crate::occupancy::{OccupancyGrid, Tag};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_valid_path(grid: &OccupancyGrid, path: &[Point], start: Point, goal: Point) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent_4(w[1]), "{} -> {} is not a unit step", w[0], w[1]);
        }
        for p in &path[1..path.len() - 1] {
            assert!(!grid.is_blocked(*p), "path crosses blocked cell {p}");
        }
    }

    #[test]
    fn open_grid_straight_line() {
        let grid = OccupancyGrid::new(10, 10);
        let path = search(Point::new(1, 5), Point::new(8, 5), &grid)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 8);
        assert!(path.iter().all(|p| p.y == 5));
    }

    #[test]
    fn same_start_and_goal_is_single_cell() {
        let grid = OccupancyGrid::new(4, 4);
        let c = Point::new(2, 3);
        assert_eq!(search(c, c, &grid), Ok(Some(vec![c])));
    }

    #[test]
    fn detours_through_gap_in_wall() {
        // Wall at x = 2 for y in 0..=3, gap at (2, 4).
        let grid = OccupancyGrid::parse(
            "
            ..#..
            ..#..
            ..#..
            ..#..
            .....
            ",
        )
        .unwrap();
        let start = Point::new(0, 2);
        let goal = Point::new(4, 2);
        let path = search(start, goal, &grid).unwrap().unwrap();
        assert_valid_path(&grid, &path, start, goal);
        assert!(path.contains(&Point::new(2, 4)));
        // 2 down + 2 across to the gap, 2 across + 2 up to the goal.
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn isolated_goal_is_not_found() {
        let grid = OccupancyGrid::parse(
            "
            .##
            ###
            ##.
            ",
        )
        .unwrap();
        assert_eq!(search(Point::new(0, 0), Point::new(2, 2), &grid), Ok(None));
    }

    #[test]
    fn full_wall_splits_regions() {
        let mut grid = OccupancyGrid::new(7, 5);
        grid.block_all((0..5).map(|y| Point::new(3, y)));
        assert_eq!(search(Point::new(0, 0), Point::new(6, 4), &grid), Ok(None));
    }

    #[test]
    fn stamped_endpoints_are_enterable() {
        // Body cells are blocked, including the cells under head and food.
        let mut grid = OccupancyGrid::new(5, 1);
        grid.block_all([Point::new(0, 0), Point::new(4, 0)]);
        let path = search(Point::new(0, 0), Point::new(4, 0), &grid)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn markers_do_not_block() {
        let mut grid = OccupancyGrid::new(3, 1);
        grid.set(Point::new(0, 0), Tag::Start);
        grid.set(Point::new(1, 0), Tag::Goal);
        grid.set(Point::new(2, 0), Tag::Goal);
        let path = search(Point::new(0, 0), Point::new(2, 0), &grid)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected() {
        let grid = OccupancyGrid::new(4, 3);
        let inside = Point::new(1, 1);
        for bad in [
            Point::new(-1, 0),
            Point::new(4, 0),
            Point::new(0, 3),
            Point::new(0, -1),
        ] {
            assert_eq!(
                search(bad, inside, &grid),
                Err(SearchError::InvalidInput {
                    endpoint: Endpoint::Start,
                    pos: bad,
                    bounds: grid.bounds(),
                })
            );
            assert_eq!(
                search(inside, bad, &grid),
                Err(SearchError::InvalidInput {
                    endpoint: Endpoint::Goal,
                    pos: bad,
                    bounds: grid.bounds(),
                })
            );
        }
        // Rejected even when start == goal.
        assert!(search(Point::new(9, 9), Point::new(9, 9), &grid).is_err());
    }

    #[test]
    fn empty_grid_rejects_everything() {
        let grid = OccupancyGrid::new(0, 0);
        assert!(matches!(
            search(Point::ZERO, Point::ZERO, &grid),
            Err(SearchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn tie_break_is_deterministic() {
        // Every monotone path is equally short on an open grid; the
        // tie-break must pick the same one each time.
        let grid = OccupancyGrid::new(6, 6);
        let a = search(Point::new(0, 0), Point::new(5, 5), &grid).unwrap();
        let b = search(Point::new(0, 0), Point::new(5, 5), &grid).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.unwrap().len(), 11);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let grid = OccupancyGrid::new(30, 30);
        let pf = PathFinder::with_limits(SearchLimits {
            max_expansions: Some(5),
        });
        assert_eq!(
            pf.search(Point::new(0, 0), Point::new(29, 29), &grid),
            Err(SearchError::BudgetExhausted { expanded: 5 })
        );
        // A short hop fits inside the same budget.
        let path = pf
            .search(Point::new(0, 0), Point::new(2, 0), &grid)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn works_through_trait_object() {
        let grid = OccupancyGrid::new(3, 3);
        let dynamic: &dyn Pather = &grid;
        let path = search(Point::new(0, 0), Point::new(2, 2), dynamic)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn snake_body_forces_detour() {
        // Head at (2,2) heading right into its own coiled body.
        let mut grid = OccupancyGrid::new(6, 5);
        grid.block_all([
            Point::new(3, 1),
            Point::new(3, 2),
            Point::new(3, 3),
            Point::new(2, 3),
            Point::new(1, 3),
        ]);
        let start = Point::new(2, 2);
        let goal = Point::new(5, 2);
        let path = search(start, goal, &grid).unwrap().unwrap();
        assert_valid_path(&grid, &path, start, goal);
        assert_eq!(path.len(), bfs_path(&grid, start, goal).unwrap().len());
    }

    #[test]
    fn matches_bfs_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..300 {
            let mut grid = OccupancyGrid::new(10, 10);
            let density = rng.random_range(0.0..0.45);
            for p in grid.bounds() {
                if rng.random_bool(density) {
                    grid.set(p, Tag::Blocked);
                }
            }
            let start = Point::new(rng.random_range(0..10), rng.random_range(0..10));
            let goal = Point::new(rng.random_range(0..10), rng.random_range(0..10));

            let got = search(start, goal, &grid).unwrap();
            let want = bfs_path(&grid, start, goal);
            match (got, want) {
                (Some(path), Some(reference)) => {
                    assert_valid_path(&grid, &path, start, goal);
                    assert_eq!(
                        path.len(),
                        reference.len(),
                        "round {round}: {start} -> {goal}\n{grid}"
                    );
                }
                (None, None) => {}
                (got, want) => panic!(
                    "round {round}: astar {:?} vs bfs {:?}\n{grid}",
                    got.map(|p| p.len()),
                    want.map(|p| p.len())
                ),
            }
        }
    }
}
