//! Seeding policies for (re)initializing a grid.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Rule;
use crate::compute::Grid;

/// Largest dimension that [`SeedPolicy::Auto`] still seeds in full.
pub const AUTO_FULL_SEED_MAX_DIMENSION: u8 = 44;

/// Dead-chance multiplier applied when [`SeedPolicy::Auto`] seeds a small grid.
pub const AUTO_DEAD_CHANCE_SCALE: f64 = 0.7;

/// How a grid is populated on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Every cell drawn independently.
    #[default]
    Full,
    /// Only the 5x5x5 block at the grid centre is drawn.
    Center,
    /// Full seeding (denser) for small grids, centre seeding otherwise.
    Auto,
}

impl SeedPolicy {
    /// Seed `grid` using `rule`'s state count and dead chance.
    pub fn apply<R: Rng + ?Sized>(self, grid: &mut Grid, rule: &Rule, rng: &mut R) {
        let state_count = rule.state_count;
        let dead_chance = rule.start_dead_chance;

        match self {
            SeedPolicy::Full => grid.init_full_random_with(state_count, dead_chance, rng),
            SeedPolicy::Center => grid.init_center_random_with(state_count, dead_chance, rng),
            SeedPolicy::Auto if grid.dimension() <= AUTO_FULL_SEED_MAX_DIMENSION => grid
                .init_full_random_with(state_count, dead_chance * AUTO_DEAD_CHANCE_SCALE, rng),
            SeedPolicy::Auto => grid.init_center_random_with(state_count, dead_chance, rng),
        }
    }
}
