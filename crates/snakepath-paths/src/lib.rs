//! Shortest-path search on occupancy grids.
//!
//! The entry point is [`PathFinder::search`]: an A* search over a
//! 4-connected grid that returns the full ordered path from start to goal.
//! Callers build an [`OccupancyGrid`] each tick, search, and turn the result
//! into movement with [`next_direction`] or a [`Steering`].
//!
//! - **A\*** shortest path ([`PathFinder`], [`search`])
//! - **BFS** reference path and reachability ([`bfs_path`], [`reachable_count`])
//! - **Direction extraction** ([`next_direction`], [`segments`], [`Steering`])
//!
//! Searches keep no state between calls; concurrent searches over distinct
//! grids need no coordination.

mod astar;
mod bfs;
mod direction;
mod distance;
mod neighbors;
mod node;
mod occupancy;
mod traits;

pub use astar::{Endpoint, PathFinder, SearchError, SearchLimits, search};
pub use bfs::{bfs_path, reachable_count};
pub use direction::{Direction, Steering, next_direction, segments};
pub use distance::{euclidean, manhattan};
pub use neighbors::{CARDINAL, Neighbors};
pub use occupancy::{GridError, OccupancyGrid, Tag};
pub use traits::Pather;
