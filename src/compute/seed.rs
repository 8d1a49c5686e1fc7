//! Random seeding of grid cells.

use rand::Rng;

use super::{CellState, Grid};

/// Edge length of the block seeded by [`Grid::init_center_random`].
pub const CENTER_SEED_SIZE: u8 = 5;

/// Draw one cell: dead with probability `dead_chance`, otherwise a uniform
/// state in `[1, state_count - 1]`.
#[inline]
pub fn random_state<R: Rng + ?Sized>(rng: &mut R, state_count: u8, dead_chance: f64) -> CellState {
    if rng.r#gen::<f64>() < dead_chance {
        0
    } else {
        rng.gen_range(1..state_count)
    }
}

impl Grid {
    /// Seed every cell independently from the thread-local RNG.
    ///
    /// # Panics
    ///
    /// Panics if `state_count < 2`.
    pub fn init_full_random(&mut self, state_count: u8, dead_chance: f64) {
        self.init_full_random_with(state_count, dead_chance, &mut rand::thread_rng());
    }

    /// Seed every cell independently from `rng`.
    pub fn init_full_random_with<R: Rng + ?Sized>(
        &mut self,
        state_count: u8,
        dead_chance: f64,
        rng: &mut R,
    ) {
        assert!(state_count >= 2, "state count must be at least 2");
        log::debug!(
            "Full seeding {}^3 grid (states={}, dead_chance={:.2})",
            self.dimension,
            state_count,
            dead_chance
        );

        for cell in &mut self.cells {
            *cell = random_state(rng, state_count, dead_chance);
        }
    }

    /// Kill every cell, then seed the 5x5x5 block centred on `dimension / 2`
    /// from the thread-local RNG.
    ///
    /// # Panics
    ///
    /// Panics if `state_count < 2`.
    pub fn init_center_random(&mut self, state_count: u8, dead_chance: f64) {
        self.init_center_random_with(state_count, dead_chance, &mut rand::thread_rng());
    }

    /// Centre seeding from `rng`. The block wraps on grids smaller than it.
    pub fn init_center_random_with<R: Rng + ?Sized>(
        &mut self,
        state_count: u8,
        dead_chance: f64,
        rng: &mut R,
    ) {
        assert!(state_count >= 2, "state count must be at least 2");
        log::debug!(
            "Centre seeding {}^3 grid (states={}, dead_chance={:.2})",
            self.dimension,
            state_count,
            dead_chance
        );

        self.clear();

        let dim = i32::from(self.dimension);
        let lower = dim / 2 - i32::from(CENTER_SEED_SIZE / 2);
        let axis = |offset: u8| (lower + i32::from(offset)).rem_euclid(dim) as u8;

        for k in 0..CENTER_SEED_SIZE {
            for j in 0..CENTER_SEED_SIZE {
                for i in 0..CENTER_SEED_SIZE {
                    let state = random_state(rng, state_count, dead_chance);
                    self.set(axis(i), axis(j), axis(k), state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_random_respects_state_range() {
        let mut grid = Grid::new(16).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        grid.init_full_random_with(5, 0.5, &mut rng);

        assert!(grid.cells().iter().all(|&s| s < 5));
        for state in 0..5 {
            assert!(
                grid.cells().contains(&state),
                "state {state} never drawn in 4096 cells"
            );
        }
    }

    #[test]
    fn test_full_random_dead_fraction() {
        let mut grid = Grid::new(32).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        grid.init_full_random_with(2, 0.7, &mut rng);

        let dead = grid.len() - grid.live_count();
        let fraction = dead as f64 / grid.len() as f64;
        assert!(
            (fraction - 0.7).abs() < 0.03,
            "dead fraction {fraction} too far from 0.7"
        );
    }

    #[test]
    fn test_full_random_extremes() {
        let mut grid = Grid::new(8).unwrap();
        grid.init_full_random(3, 1.0);
        assert_eq!(grid.live_count(), 0);

        grid.init_full_random(3, 0.0);
        assert_eq!(grid.live_count(), grid.len());
    }

    #[test]
    fn test_center_random_only_touches_block() {
        let mut grid = Grid::new(16).unwrap();
        grid.init_full_random(2, 0.0);
        grid.init_center_random(4, 0.0);

        assert_eq!(grid.live_count(), 125);
        for idx in 0..grid.len() {
            let [x, y, z] = grid.reverse_idx(idx);
            let inside = [x, y, z].iter().all(|c| (6..=10).contains(c));
            assert_eq!(grid.cells()[idx] != 0, inside, "cell ({x}, {y}, {z})");
        }
    }

    #[test]
    fn test_center_random_small_grid_wraps() {
        let mut grid = Grid::new(4).unwrap();
        grid.init_center_random(2, 0.0);
        assert_eq!(grid.live_count(), grid.len());
    }
}
