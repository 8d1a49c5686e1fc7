//! Compute module - Grid storage and the parallel simulation engine.

mod draw;
mod grid;
mod seed;
mod shard;
mod simulation;
mod stats;
mod update;

pub use draw::*;
pub use grid::{CellState, Grid, GridError};
pub use seed::*;
pub use shard::*;
pub use simulation::*;
pub use stats::*;
pub use update::*;
