//! Configuration types for Life3D simulation parameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Rule, RuleError, RulePreset, SeedPolicy};
use crate::compute::{DEFAULT_SHARD_COUNT, Grid, GridError, MAX_UPDATE_RATE};

fn default_dimension() -> u8 {
    100
}

fn default_shard_count() -> usize {
    DEFAULT_SHARD_COUNT
}

fn default_update_rate() -> usize {
    1
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Edge length of the cubic grid.
    #[serde(default = "default_dimension")]
    pub dimension: u8,
    /// Number of worker shards; `dimension³` must divide evenly.
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,
    /// Active rule, either a preset name or an explicit rule.
    #[serde(default)]
    pub rule: RuleSpec,
    /// Seeding policy. Falls back to the preset's policy, then full seeding.
    #[serde(default)]
    pub seeding: Option<SeedPolicy>,
    /// Advance once every `update_rate` external ticks.
    #[serde(default = "default_update_rate")]
    pub update_rate: usize,
    /// Fixed RNG seed for reproducible seeding.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Bounds for interactive resizing.
    #[serde(default)]
    pub resize: ResizeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            shard_count: default_shard_count(),
            rule: RuleSpec::default(),
            seeding: None,
            update_rate: default_update_rate(),
            random_seed: None,
            resize: ResizeConfig::default(),
        }
    }
}

/// Rule selection: a named preset or a fully specified rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Preset(RulePreset),
    Custom(Rule),
}

impl Default for RuleSpec {
    fn default() -> Self {
        RuleSpec::Preset(RulePreset::default())
    }
}

impl RuleSpec {
    /// Resolve to a rule value.
    pub fn rule(&self) -> Rule {
        match self {
            RuleSpec::Preset(preset) => preset.rule(),
            RuleSpec::Custom(rule) => *rule,
        }
    }

    /// Seeding policy suggested by a preset.
    pub fn preferred_seeding(&self) -> Option<SeedPolicy> {
        match self {
            RuleSpec::Preset(preset) => Some(preset.seed_policy()),
            RuleSpec::Custom(_) => None,
        }
    }
}

/// Limits for growing and shrinking the grid at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub min_dimension: u8,
    pub max_dimension: u8,
    pub step: u8,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_dimension: 16,
            max_dimension: 100,
            step: 4,
        }
    }
}

impl SimulationConfig {
    /// Config for a preset with its preferred seeding.
    pub fn from_preset(preset: RulePreset) -> Self {
        Self {
            rule: RuleSpec::Preset(preset),
            ..Default::default()
        }
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective seeding policy.
    pub fn seed_policy(&self) -> SeedPolicy {
        self.seeding
            .or_else(|| self.rule.preferred_seeding())
            .unwrap_or_default()
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Grid::validate_dimension(self.dimension, self.shard_count)?;
        self.rule.rule().validate()?;
        if !(1..=MAX_UPDATE_RATE).contains(&self.update_rate) {
            return Err(ConfigError::InvalidUpdateRate(self.update_rate));
        }
        let resize = &self.resize;
        if resize.min_dimension == 0
            || resize.min_dimension > resize.max_dimension
            || resize.step == 0
        {
            return Err(ConfigError::InvalidResizeBounds {
                min: resize.min_dimension,
                max: resize.max_dimension,
                step: resize.step,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("Update rate must be within 1..={max}, got {0}", max = MAX_UPDATE_RATE)]
    InvalidUpdateRate(usize),
    #[error("Invalid resize bounds: min {min}, max {max}, step {step}")]
    InvalidResizeBounds { min: u8, max: u8, step: u8 },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
