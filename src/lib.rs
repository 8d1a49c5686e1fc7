//! Life3D - Multi-state 3D cellular automata on a toroidal lattice.
//!
//! Cells live on a cube of edge `dimension` whose faces wrap around. A
//! cell is dead (0), fully alive (1) or decaying (above 1); newborn cells
//! enter at the top state and count down one state per tick before the
//! rule decides again whether they survive.
//!
//! # Architecture
//!
//! - `schema`: Rules, presets, seeding policies and configuration
//! - `compute`: Grid storage, sharded parallel update and extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use life3d::{
//!     compute::Simulation,
//!     schema::{RulePreset, SimulationConfig},
//! };
//!
//! let config = SimulationConfig::from_preset(RulePreset::Decay);
//! let mut simulation = Simulation::new(&config).expect("valid config");
//!
//! for frame in 0..100 {
//!     simulation.tick(frame);
//!     let points = simulation.draw();
//!     println!("{} visible cells", points.len());
//! }
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Extraction, Grid, GridError, Simulation, SimulationStats};
pub use schema::{Rule, RulePreset, SeedPolicy, SimulationConfig};
