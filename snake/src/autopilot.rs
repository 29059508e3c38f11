//! Steering the snake toward the food with [`PathFinder`].

use std::collections::VecDeque;

use snakepath_core::{Point, Range};
use snakepath_paths::{Direction, OccupancyGrid, PathFinder, SearchLimits, Tag, reachable_count};

use crate::config::ReplanPolicy;
use crate::snake::Snake;

/// Build the occupancy grid for one tick: body cells blocked, head marked
/// start, food marked goal.
pub fn occupancy(field: Range, snake: &Snake, food: Point) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(field.width(), field.height());
    grid.block_all(snake.iter());
    grid.set(snake.head(), Tag::Start);
    grid.set(food, Tag::Goal);
    grid
}

/// Chooses a heading each tick.
#[derive(Debug, Clone)]
pub struct Autopilot {
    finder: PathFinder,
    replan: ReplanPolicy,
    plan: VecDeque<Point>,
    searches: u64,
}

impl Autopilot {
    pub fn new(replan: ReplanPolicy, max_expansions: Option<usize>) -> Self {
        Self {
            finder: PathFinder::with_limits(SearchLimits { max_expansions }),
            replan,
            plan: VecDeque::new(),
            searches: 0,
        }
    }

    /// The route currently being followed, head first. Empty when there is
    /// none.
    pub fn plan(&self) -> impl Iterator<Item = Point> + '_ {
        self.plan.iter().copied()
    }

    /// Number of searches run so far.
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Forget the current route.
    pub fn invalidate(&mut self) {
        self.plan.clear();
    }

    /// Heading for the next move, or `None` when every move is fatal.
    pub fn decide(
        &mut self,
        field: Range,
        snake: &Snake,
        food: Point,
        wrap: bool,
    ) -> Option<Direction> {
        let grid = occupancy(field, snake, food);
        let head = snake.head();

        if !(self.replan == ReplanPolicy::Cached && self.plan_is_valid(&grid, head, food)) {
            self.replan(&grid, head, food);
        }

        if self.plan.len() >= 2 {
            let d = Direction::between(self.plan[0], self.plan[1]);
            self.plan.pop_front();
            if d.is_some() {
                return d;
            }
        }
        self.plan.clear();
        fallback(grid, field, snake, wrap)
    }

    fn plan_is_valid(&self, grid: &OccupancyGrid, head: Point, food: Point) -> bool {
        self.plan.len() >= 2
            && self.plan.front() == Some(&head)
            && self.plan.back() == Some(&food)
            && self.plan.iter().skip(1).all(|&p| !grid.is_blocked(p))
    }

    fn replan(&mut self, grid: &OccupancyGrid, head: Point, food: Point) {
        self.searches += 1;
        self.plan = match self.finder.search(head, food, grid) {
            Ok(Some(path)) => path.into(),
            Ok(None) => {
                log::debug!("no path from {head} to {food}");
                VecDeque::new()
            }
            Err(e) => {
                log::warn!("search failed: {e}");
                VecDeque::new()
            }
        };
    }
}

/// The non-fatal move that keeps the most room, ties going to the earlier
/// direction in [`Direction::ALL`].
fn fallback(mut grid: OccupancyGrid, field: Range, snake: &Snake, wrap: bool) -> Option<Direction> {
    let head = snake.head();
    // The head is body once the move is made.
    grid.set(head, Tag::Blocked);
    let mut best: Option<(Direction, usize)> = None;
    for d in Direction::ALL {
        let mut next = head + d.delta();
        if wrap {
            next = next.wrap(field);
        } else if !field.contains(next) {
            continue;
        }
        if snake.would_bite(next, false) {
            continue;
        }
        let room = reachable_count(&grid, next);
        if best.is_none_or(|(_, r)| room > r) {
            best = Some((d, room));
        }
    }
    if let Some((d, room)) = best {
        log::trace!("fallback {d} with {room} cells of room");
    }
    best.map(|(d, _)| d)
}
