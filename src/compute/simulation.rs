//! Simulation driver tying a grid to its active rule and cadence.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Extraction, Grid, GridError, SimulationStats, Timings};
use crate::schema::{
    ConfigError, ResizeConfig, Rule, RuleError, RulePreset, SeedPolicy, SimulationConfig,
};

/// Slowest cadence: one update every this many external ticks.
pub const MAX_UPDATE_RATE: usize = 256;

/// A running simulation: grid, active rule, seeding policy and cadence.
pub struct Simulation {
    grid: Grid,
    rule: Rule,
    seeding: SeedPolicy,
    update_rate: usize,
    resize: ResizeConfig,
    rng: StdRng,
    generation: u64,
    timings: Timings,
}

impl Simulation {
    /// Create a simulation from a configuration and seed it.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::with_shard_count(config.dimension, config.shard_count)?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut simulation = Self {
            grid,
            rule: config.rule.rule(),
            seeding: config.seed_policy(),
            update_rate: config.update_rate,
            resize: config.resize,
            rng,
            generation: 0,
            timings: Timings::default(),
        };
        simulation.restart();
        Ok(simulation)
    }

    /// Reseed the grid with the active rule and policy.
    pub fn restart(&mut self) {
        log::debug!(
            "Restarting {}^3 grid with rule {} ({:?} seeding)",
            self.grid.dimension(),
            self.rule,
            self.seeding
        );
        self.seeding.apply(&mut self.grid, &self.rule, &mut self.rng);
        self.generation = 0;
    }

    /// Replace the active rule and reseed.
    pub fn set_rule(&mut self, rule: Rule, seeding: SeedPolicy) -> Result<(), RuleError> {
        rule.validate()?;
        self.rule = rule;
        self.seeding = seeding;
        self.restart();
        Ok(())
    }

    /// Switch to a preset with its preferred seeding and reseed.
    pub fn apply_preset(&mut self, preset: RulePreset) {
        log::info!("Switching to preset {preset:?}");
        self.rule = preset.rule();
        self.seeding = preset.seed_policy();
        self.restart();
    }

    /// Resize the grid and reseed. The grid is unchanged on error.
    pub fn resize(&mut self, dimension: u8) -> Result<(), GridError> {
        self.grid.resize(dimension)?;
        self.restart();
        Ok(())
    }

    /// Grow by one resize step, capped at the configured maximum.
    pub fn grow(&mut self) -> Result<(), GridError> {
        let dimension = self
            .grid
            .dimension()
            .saturating_add(self.resize.step)
            .min(self.resize.max_dimension);
        self.resize(dimension)
    }

    /// Shrink by one resize step, floored at the configured minimum.
    pub fn shrink(&mut self) -> Result<(), GridError> {
        let dimension = self
            .grid
            .dimension()
            .saturating_sub(self.resize.step)
            .max(self.resize.min_dimension);
        self.resize(dimension)
    }

    /// Advance one tick if `frame` falls on the update cadence.
    ///
    /// Returns whether the grid advanced.
    pub fn tick(&mut self, frame: usize) -> bool {
        if frame % self.update_rate != 0 {
            return false;
        }
        self.step();
        true
    }

    /// Advance exactly one tick.
    pub fn step(&mut self) {
        let start = Instant::now();
        self.grid.update(&self.rule);
        let elapsed = start.elapsed();

        self.timings.record_update(elapsed);
        self.generation += 1;
        log::trace!(
            "Generation {} updated in {:.3} ms",
            self.generation,
            elapsed.as_secs_f64() * 1000.0
        );
    }

    /// Advance `steps` ticks.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Update half as often, capped at [`MAX_UPDATE_RATE`].
    pub fn slower(&mut self) {
        self.update_rate = self.update_rate.saturating_mul(2).min(MAX_UPDATE_RATE);
    }

    /// Update twice as often.
    pub fn faster(&mut self) {
        self.update_rate = (self.update_rate / 2).max(1);
    }

    /// Extract points and colours with the active rule's palette.
    pub fn draw(&mut self) -> Extraction {
        let start = Instant::now();
        let extraction = self.grid.draw_rule(&self.rule);
        self.timings.record_draw(start.elapsed());
        extraction
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::from_grid(&self.grid)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for placing cells by hand.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[inline]
    pub fn seeding(&self) -> SeedPolicy {
        self.seeding
    }

    #[inline]
    pub fn update_rate(&self) -> usize {
        self.update_rate
    }

    /// Ticks since the last restart.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }
}
