//! Rule types for multi-state 3D Life simulations.
//!
//! A rule is plain data: survival and birth conditions are neighbour-count
//! masks, and the colour function is a named [`Palette`]. Rules are `Copy`
//! and can be written in the familiar `S/B/N/M` notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SeedPolicy;
use crate::compute::CellState;

/// Largest possible live-neighbour count in a Moore neighbourhood.
pub const MAX_NEIGHBOURS: u8 = 26;

/// RGB colour in `[0, 1]` per component.
pub type Rgb = [f32; 3];

/// Set of neighbour counts (`0..=26`) stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NeighbourSet(u32);

impl NeighbourSet {
    const FULL_MASK: u32 = (1 << (MAX_NEIGHBOURS as u32 + 1)) - 1;

    /// Set matching no count.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set matching every count `0..=26`.
    pub const fn all() -> Self {
        Self(Self::FULL_MASK)
    }

    /// Build a set from inclusive `(low, high)` ranges.
    pub fn from_ranges(ranges: &[(u8, u8)]) -> Result<Self, RuleError> {
        let mut set = Self::empty();
        for &(low, high) in ranges {
            if high > MAX_NEIGHBOURS {
                return Err(RuleError::NeighbourCountOutOfRange(high));
            }
            if low > high {
                return Err(RuleError::InvalidRange(format!("{low}-{high}")));
            }
            for count in low..=high {
                set.0 |= 1 << count;
            }
        }
        Ok(set)
    }

    /// Build a set from individual counts.
    pub fn from_counts(counts: &[u8]) -> Result<Self, RuleError> {
        let ranges: Vec<(u8, u8)> = counts.iter().map(|&c| (c, c)).collect();
        Self::from_ranges(&ranges)
    }

    #[inline]
    pub fn contains(self, count: u8) -> bool {
        count <= MAX_NEIGHBOURS && self.0 & (1 << count) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw mask, bit `n` set when count `n` matches.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Contiguous inclusive runs of matching counts, ascending.
    pub fn runs(self) -> Vec<(u8, u8)> {
        let mut runs = Vec::new();
        let mut start: Option<u8> = None;
        for count in 0..=MAX_NEIGHBOURS + 1 {
            let hit = count <= MAX_NEIGHBOURS && self.contains(count);
            match (hit, start) {
                (true, None) => start = Some(count),
                (false, Some(low)) => {
                    runs.push((low, count - 1));
                    start = None;
                }
                _ => {}
            }
        }
        runs
    }
}

impl fmt::Display for NeighbourSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .runs()
            .into_iter()
            .map(|(low, high)| {
                if low == high {
                    low.to_string()
                } else {
                    format!("{low}-{high}")
                }
            })
            .collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for NeighbourSet {
    type Err = RuleError;

    /// Parse range notation such as `"4"`, `"6-8"` or `"13-14,17-19"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parse = |text: &str| {
                text.trim()
                    .parse::<u8>()
                    .map_err(|_| RuleError::InvalidRange(part.to_string()))
            };
            let range = match part.split_once('-') {
                Some((low, high)) => (parse(low)?, parse(high)?),
                None => {
                    let count = parse(part)?;
                    (count, count)
                }
            };
            ranges.push(range);
        }
        Self::from_ranges(&ranges)
    }
}

impl TryFrom<String> for NeighbourSet {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NeighbourSet> for String {
    fn from(set: NeighbourSet) -> Self {
        set.to_string()
    }
}

/// Named colour functions for extracted cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Yellow to red by decay state.
    Ember,
    /// Green to blue with distance from the grid centre (square-root falloff).
    Radial,
    /// Position mapped straight onto RGB.
    #[default]
    Spatial,
    /// Dark to red with squared distance from the grid centre.
    Fade,
}

impl Palette {
    /// Colour of a cell given its grid context.
    pub fn color(
        self,
        max_distance: f32,
        dimension: u8,
        state: CellState,
        x: u8,
        y: u8,
        z: u8,
    ) -> Rgb {
        match self {
            Palette::Ember => {
                let green = match state {
                    1 => 0.9,
                    2 => 0.6,
                    3 => 0.3,
                    4 => 0.09,
                    _ => 0.0,
                };
                [1.0, green, 0.0]
            }
            Palette::Radial => {
                let t = normalized_distance(max_distance, dimension, x, y, z).sqrt();
                [0.1, 1.0 - t, t]
            }
            Palette::Spatial => {
                let dim = f32::from(dimension);
                [f32::from(x) / dim, f32::from(y) / dim, f32::from(z) / dim]
            }
            Palette::Fade => {
                let t = normalized_distance(max_distance, dimension, x, y, z);
                [t, 0.0, 0.1]
            }
        }
    }
}

/// Squared distance from the grid centre.
pub fn distance_from_center(dimension: u8, x: u8, y: u8, z: u8) -> f32 {
    let center = i32::from(dimension / 2);
    let dx = i32::from(x) - center;
    let dy = i32::from(y) - center;
    let dz = i32::from(z) - center;
    (dx * dx + dy * dy + dz * dz) as f32
}

fn normalized_distance(max_distance: f32, dimension: u8, x: u8, y: u8, z: u8) -> f32 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    distance_from_center(dimension, x, y, z) / max_distance
}

/// Transition rule for a multi-state automaton.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Counts for which a state-1 cell stays alive.
    pub survival: NeighbourSet,
    /// Counts for which a dead cell is born.
    pub birth: NeighbourSet,
    /// Colour function used when drawing.
    #[serde(default)]
    pub palette: Palette,
    /// Number of distinct states; newborn cells enter at `state_count - 1`.
    pub state_count: u8,
    /// Probability that a seeded cell starts dead.
    pub start_dead_chance: f64,
}

impl Default for Rule {
    fn default() -> Self {
        RulePreset::default().rule()
    }
}

impl Rule {
    #[inline]
    pub fn survives(&self, count: u8) -> bool {
        self.survival.contains(count)
    }

    #[inline]
    pub fn is_born(&self, count: u8) -> bool {
        self.birth.contains(count)
    }

    /// State a newborn cell enters at. Never wraps, even for a rule that
    /// fails [`Rule::validate`].
    #[inline]
    pub fn newborn_state(&self) -> CellState {
        self.state_count.saturating_sub(1)
    }

    #[inline]
    pub fn color(
        &self,
        max_distance: f32,
        dimension: u8,
        state: CellState,
        x: u8,
        y: u8,
        z: u8,
    ) -> Rgb {
        self.palette.color(max_distance, dimension, state, x, y, z)
    }

    /// Replace the palette, keeping the transition behaviour.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_start_dead_chance(mut self, chance: f64) -> Self {
        self.start_dead_chance = chance;
        self
    }

    /// Validate rule parameters.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.state_count < 2 {
            return Err(RuleError::InvalidStateCount(self.state_count));
        }
        if !(0.0..=1.0).contains(&self.start_dead_chance) {
            return Err(RuleError::InvalidDeadChance(self.start_dead_chance));
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/M",
            self.survival, self.birth, self.state_count
        )
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    /// Parse `survival/birth/states[/M]` notation.
    ///
    /// Palette and dead chance take their defaults; adjust with
    /// [`Rule::with_palette`] and [`Rule::with_start_dead_chance`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('/').map(str::trim).collect();
        let (survival, birth, states) = match fields.as_slice() {
            [survival, birth, states] => (survival, birth, states),
            [survival, birth, states, neighbourhood] => {
                if !neighbourhood.eq_ignore_ascii_case("m") {
                    return Err(RuleError::UnsupportedNeighbourhood(
                        neighbourhood.to_string(),
                    ));
                }
                (survival, birth, states)
            }
            _ => return Err(RuleError::Malformed(s.to_string())),
        };

        let state_count = states
            .parse::<u8>()
            .map_err(|_| RuleError::Malformed(s.to_string()))?;

        let rule = Rule {
            survival: survival.parse()?,
            birth: birth.parse()?,
            palette: Palette::default(),
            state_count,
            start_dead_chance: 0.5,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Built-in rule presets.
///
/// Rules from <https://softologyblog.wordpress.com/2019/12/28/3d-cellular-automata-3/>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    /// 4/4/5 with state-coloured embers.
    Fours,
    /// 6-8/6-8/2 with a radial gradient.
    SixEight,
    /// 13-26/13-14,17-19/2 with positional colouring.
    #[default]
    Clouds,
    /// 1,4,8,11,13-26/13-26/5 fading out from the centre.
    Decay,
}

impl RulePreset {
    pub const ALL: [RulePreset; 4] = [
        RulePreset::Fours,
        RulePreset::SixEight,
        RulePreset::Clouds,
        RulePreset::Decay,
    ];

    /// Build the rule value for this preset.
    pub fn rule(self) -> Rule {
        // Masks are built from constant in-range counts.
        let mask = |ranges: &[(u8, u8)]| {
            NeighbourSet::from_ranges(ranges).unwrap_or_else(|_| NeighbourSet::empty())
        };

        match self {
            RulePreset::Fours => Rule {
                survival: mask(&[(4, 4)]),
                birth: mask(&[(4, 4)]),
                palette: Palette::Ember,
                state_count: 5,
                start_dead_chance: 0.85,
            },
            RulePreset::SixEight => Rule {
                survival: mask(&[(6, 8)]),
                birth: mask(&[(6, 8)]),
                palette: Palette::Radial,
                state_count: 2,
                start_dead_chance: 0.70,
            },
            RulePreset::Clouds => Rule {
                survival: mask(&[(13, 26)]),
                birth: mask(&[(13, 14), (17, 19)]),
                palette: Palette::Spatial,
                state_count: 2,
                start_dead_chance: 0.5,
            },
            RulePreset::Decay => Rule {
                survival: mask(&[(1, 1), (4, 4), (8, 8), (11, 11), (13, 26)]),
                birth: mask(&[(13, 26)]),
                palette: Palette::Fade,
                state_count: 5,
                start_dead_chance: 0.65,
            },
        }
    }

    /// Seeding policy this preset is tuned for.
    pub fn seed_policy(self) -> SeedPolicy {
        match self {
            RulePreset::Fours | RulePreset::SixEight => SeedPolicy::Auto,
            RulePreset::Clouds | RulePreset::Decay => SeedPolicy::Full,
        }
    }
}

/// Rule parsing and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Neighbour count {0} exceeds the Moore neighbourhood maximum of 26")]
    NeighbourCountOutOfRange(u8),
    #[error("Invalid neighbour range '{0}'")]
    InvalidRange(String),
    #[error("Malformed rule '{0}', expected survival/birth/states[/M]")]
    Malformed(String),
    #[error("Unsupported neighbourhood '{0}', only Moore (M) is available")]
    UnsupportedNeighbourhood(String),
    #[error("State count must be at least 2, got {0}")]
    InvalidStateCount(u8),
    #[error("Start dead chance must be within [0, 1], got {0}")]
    InvalidDeadChance(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbour_set_ranges() {
        let set: NeighbourSet = "13-14,17-19".parse().unwrap();
        for count in 0..=MAX_NEIGHBOURS {
            let expected = matches!(count, 13 | 14 | 17..=19);
            assert_eq!(set.contains(count), expected, "count {count}");
        }
        assert_eq!(set.to_string(), "13-14,17-19");
    }

    #[test]
    fn test_neighbour_set_bounds() {
        assert!(NeighbourSet::all().contains(0));
        assert!(NeighbourSet::all().contains(26));
        assert!(!NeighbourSet::all().contains(27));
        assert!(NeighbourSet::empty().is_empty());
        assert_eq!(NeighbourSet::all().to_string(), "0-26");
        assert!("27".parse::<NeighbourSet>().is_err());
        assert!("8-6".parse::<NeighbourSet>().is_err());
        assert!("x".parse::<NeighbourSet>().is_err());
    }

    #[test]
    fn test_rule_notation() {
        let rule: Rule = "4/4/5/M".parse().unwrap();
        assert_eq!(rule.survival, RulePreset::Fours.rule().survival);
        assert_eq!(rule.birth, RulePreset::Fours.rule().birth);
        assert_eq!(rule.state_count, 5);
        assert_eq!(rule.newborn_state(), 4);

        let decay = RulePreset::Decay.rule();
        assert_eq!(decay.to_string(), "1,4,8,11,13-26/13-26/5/M");
        let reparsed: Rule = decay.to_string().parse().unwrap();
        assert_eq!(reparsed.survival, decay.survival);
        assert_eq!(reparsed.birth, decay.birth);
    }

    #[test]
    fn test_rule_notation_errors() {
        assert!(matches!(
            "4/4/5/VN".parse::<Rule>(),
            Err(RuleError::UnsupportedNeighbourhood(_))
        ));
        assert!(matches!("4/4".parse::<Rule>(), Err(RuleError::Malformed(_))));
        assert!(matches!(
            "4/4/1".parse::<Rule>(),
            Err(RuleError::InvalidStateCount(1))
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in RulePreset::ALL {
            preset.rule().validate().unwrap();
        }
    }

    #[test]
    fn test_clouds_predicates() {
        let rule = RulePreset::Clouds.rule();
        assert!(rule.is_born(13));
        assert!(!rule.is_born(15));
        assert!(rule.is_born(18));
        assert!(rule.survives(26));
        assert!(!rule.survives(12));
    }

    #[test]
    fn test_palettes() {
        assert_eq!(Palette::Ember.color(0.0, 8, 1, 0, 0, 0), [1.0, 0.9, 0.0]);
        assert_eq!(Palette::Ember.color(0.0, 8, 7, 0, 0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(Palette::Spatial.color(0.0, 4, 1, 2, 1, 0), [0.5, 0.25, 0.0]);

        // Centre cell sits at distance zero
        assert_eq!(Palette::Fade.color(48.0, 8, 1, 4, 4, 4), [0.0, 0.0, 0.1]);
        assert_eq!(Palette::Radial.color(48.0, 8, 1, 4, 4, 4), [0.1, 1.0, 0.0]);

        // Corner (0,0,0) of an 8-grid is at squared distance 48
        assert_eq!(Palette::Fade.color(48.0, 8, 1, 0, 0, 0), [1.0, 0.0, 0.1]);

        // Degenerate max distance does not produce NaN
        let color = Palette::Radial.color(0.0, 1, 1, 0, 0, 0);
        assert!(color.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_rule_json() {
        let rule = RulePreset::SixEight.rule();
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"survival\":\"6-8\""));
        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_newborn_state() {
        assert_eq!(RulePreset::Fours.rule().newborn_state(), 4);
        assert_eq!(RulePreset::Clouds.rule().newborn_state(), 1);

        let mut rule = RulePreset::Clouds.rule();
        rule.state_count = 0;
        assert!(rule.validate().is_err());
        assert_eq!(rule.newborn_state(), 0);
    }

    #[test]
    fn test_invalid_dead_chance() {
        let rule = RulePreset::Fours.rule().with_start_dead_chance(1.5);
        assert!(matches!(rule.validate(), Err(RuleError::InvalidDeadChance(_))));
    }
}
