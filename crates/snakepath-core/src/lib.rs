//! **snakepath-core**: shared types for the snakepath workspace.
//!
//! Geometry primitives for addressing grid cells, a styled screen buffer with
//! frame diffing, input messages, and the tick-driven Elm-architecture
//! application loop that owns all mutable game state.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cell::{AttrMask, Cell, Color, Style};
pub use geom::{Point, Range};
pub use grid::{Frame, FrameCell, Grid};
pub use messages::{Key, ModMask, Msg};
