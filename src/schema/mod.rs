//! Schema module - Rule, seeding and configuration types for Life3D simulations.

mod config;
mod rule;
mod seed;

pub use config::*;
pub use rule::*;
pub use seed::*;
