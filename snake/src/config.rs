use std::time::Duration;

use clap::ValueEnum;

/// When the autopilot asks the path finder for a new route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReplanPolicy {
    /// Search again on every tick.
    #[default]
    EveryTick,
    /// Search once and walk the path until it is used up, the food moves,
    /// or a cell on it becomes occupied.
    Cached,
}

/// How a planned step becomes the snake's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SteeringPolicy {
    /// Always take the direction of the first path step.
    #[default]
    Direct,
    /// Take the first path step unless it reverses the current heading.
    NoReverse,
}

/// Configuration for a snake game.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeConfig {
    /// Playfield width in cells.
    pub width: i32,
    /// Playfield height in cells (the status line is extra).
    pub height: i32,
    /// Segments at the start of each round.
    pub initial_length: usize,
    /// Time between game ticks.
    pub tick: Duration,
    /// Seed for food placement. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Whether the autopilot steers at start.
    pub autopilot: bool,
    pub replan: ReplanPolicy,
    pub steering: SteeringPolicy,
    /// Leaving one edge re-enters at the opposite one. Otherwise edges kill.
    pub wrap: bool,
    /// Node budget per search. `None` is unbounded.
    pub max_expansions: Option<usize>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 23,
            initial_length: 3,
            tick: Duration::from_millis(40),
            seed: None,
            autopilot: true,
            replan: ReplanPolicy::default(),
            steering: SteeringPolicy::default(),
            wrap: true,
            max_expansions: None,
        }
    }
}

impl SnakeConfig {
    /// Default configuration with the given playfield size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Shrink the playfield to fit a `width` × `height` screen, keeping one
    /// row for the status line. Returns whether the size changed.
    pub fn fit_to_screen(&mut self, width: i32, height: i32) -> bool {
        let w = self.width.min(width).max(1);
        let h = self.height.min(height - 1).max(1);
        let changed = (w, h) != (self.width, self.height);
        self.width = w;
        self.height = h;
        changed
    }

    /// A small deterministic field, handy for tests.
    pub fn small(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(12, 10)
        }
    }
}
