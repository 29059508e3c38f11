//! Terminal snake that can steer itself.
//!
//! Each tick the [`Autopilot`] stamps the body into an occupancy grid and
//! asks [`snakepath_paths::PathFinder`] for a route from the head to the
//! food. [`Game`] is the application model driven by
//! [`snakepath_core::App`].

pub mod autopilot;
pub mod config;
pub mod game;
pub mod snake;

pub use autopilot::{Autopilot, occupancy};
pub use config::{ReplanPolicy, SnakeConfig, SteeringPolicy};
pub use game::{Game, Phase};
pub use snake::Snake;
