//! Cubic cell grid with toroidal neighbourhood lookups.
//!
//! Cells are stored flat with `x` varying fastest:
//! `idx(x, y, z) = (z * dimension + y) * dimension + x`.

use super::{DEFAULT_SHARD_COUNT, ShardPlan};

/// State of a single cell: 0 is dead, 1 fully alive, higher values decaying.
pub type CellState = u8;

/// Grid construction and resize errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Invalid dimension {dimension}: {reason}")]
    InvalidDimension { dimension: u8, reason: String },
    #[error("Shard count must be non-zero, got {0}")]
    InvalidShardCount(usize),
    #[error("{len} cells cannot be split evenly into {shard_count} shards")]
    UnevenShards { len: usize, shard_count: usize },
}

/// Cubic lattice of multi-state cells.
#[derive(Debug, Clone)]
pub struct Grid {
    pub(super) cells: Vec<CellState>,
    /// Pre-tick copy used for neighbour lookups during `update`.
    pub(super) snapshot: Vec<CellState>,
    pub(super) dimension: u8,
    max_distance: f32,
    pub(super) shards: ShardPlan,
}

impl Grid {
    /// Create an all-dead grid using the default shard count.
    pub fn new(dimension: u8) -> Result<Self, GridError> {
        Self::with_shard_count(dimension, DEFAULT_SHARD_COUNT)
    }

    /// Create an all-dead grid split into `shard_count` worker shards.
    pub fn with_shard_count(dimension: u8, shard_count: usize) -> Result<Self, GridError> {
        let shards = Self::plan(dimension, shard_count)?;
        let len = shards.len();

        Ok(Self {
            cells: vec![0; len],
            snapshot: vec![0; len],
            dimension,
            max_distance: max_distance(dimension),
            shards,
        })
    }

    /// Check that `dimension` yields a valid grid for `shard_count` shards.
    pub fn validate_dimension(dimension: u8, shard_count: usize) -> Result<(), GridError> {
        Self::plan(dimension, shard_count).map(|_| ())
    }

    fn plan(dimension: u8, shard_count: usize) -> Result<ShardPlan, GridError> {
        if dimension == 0 {
            return Err(GridError::InvalidDimension {
                dimension,
                reason: "grid needs at least one cell".to_string(),
            });
        }

        let len = u32::from(dimension)
            .checked_pow(3)
            .ok_or_else(|| GridError::InvalidDimension {
                dimension,
                reason: "cell count overflows the index range".to_string(),
            })? as usize;

        ShardPlan::new(len, shard_count).map_err(|e| match e {
            GridError::UnevenShards { len, shard_count } => GridError::InvalidDimension {
                dimension,
                reason: format!("{len} cells are not divisible by {shard_count} shards"),
            },
            other => other,
        })
    }

    /// Reallocate for a new dimension, killing every cell.
    ///
    /// On error the grid is left untouched.
    pub fn resize(&mut self, dimension: u8) -> Result<(), GridError> {
        let shards = Self::plan(dimension, self.shards.shard_count())?;
        let len = shards.len();

        log::debug!(
            "Resizing grid {}^3 -> {}^3 ({} cells)",
            self.dimension,
            dimension,
            len
        );

        self.cells = vec![0; len];
        self.snapshot = vec![0; len];
        self.dimension = dimension;
        self.max_distance = max_distance(dimension);
        self.shards = shards;
        Ok(())
    }

    /// Edge length of the cube.
    #[inline]
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Total number of cells (`dimension³`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Squared distance from the centre to a corner, `3 * (dimension / 2)²`.
    #[inline]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    #[inline]
    pub fn shard_plan(&self) -> &ShardPlan {
        &self.shards
    }

    /// Raw cell states in index order.
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Flat index of `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside `[0, dimension)`.
    #[inline]
    pub fn idx(&self, x: u8, y: u8, z: u8) -> usize {
        index_of(self.dimension, x, y, z)
    }

    /// Coordinates `[x, y, z]` of a flat index.
    #[inline]
    pub fn reverse_idx(&self, idx: usize) -> [u8; 3] {
        coords_of(self.dimension, idx)
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8, z: u8) -> CellState {
        self.cells[self.idx(x, y, z)]
    }

    /// Set a cell, returning its previous state.
    pub fn set(&mut self, x: u8, y: u8, z: u8, state: CellState) -> CellState {
        let idx = self.idx(x, y, z);
        std::mem::replace(&mut self.cells[idx], state)
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Number of non-dead cells among the 26 toroidal neighbours.
    pub fn count_neighbours(&self, x: u8, y: u8, z: u8) -> u8 {
        count_live_neighbours(&self.cells, self.dimension, x, y, z)
    }

    /// Number of non-dead cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&s| s != 0).count()
    }
}

fn max_distance(dimension: u8) -> f32 {
    let half = f32::from(dimension / 2);
    3.0 * half * half
}

#[inline]
pub(super) fn index_of(dimension: u8, x: u8, y: u8, z: u8) -> usize {
    assert!(
        x < dimension && y < dimension && z < dimension,
        "coordinate ({x}, {y}, {z}) outside grid of dimension {dimension}"
    );
    let dim = usize::from(dimension);
    (usize::from(z) * dim + usize::from(y)) * dim + usize::from(x)
}

#[inline]
pub(super) fn coords_of(dimension: u8, idx: usize) -> [u8; 3] {
    let dim = usize::from(dimension);
    assert!(
        idx < dim * dim * dim,
        "index {idx} outside grid of dimension {dimension}"
    );
    let x = idx % dim;
    let y = (idx / dim) % dim;
    let z = idx / (dim * dim);
    [x as u8, y as u8, z as u8]
}

/// Count non-dead cells in the 3x3x3 block around `(x, y, z)`, excluding
/// the centre. Coordinates wrap at the edges.
#[inline]
pub(super) fn count_live_neighbours(
    cells: &[CellState],
    dimension: u8,
    x: u8,
    y: u8,
    z: u8,
) -> u8 {
    let dim = usize::from(dimension);
    let wrap = |c: u8| {
        let c = usize::from(c);
        [(c + dim - 1) % dim, c, (c + 1) % dim]
    };
    let xs = wrap(x);
    let ys = wrap(y);
    let zs = wrap(z);

    let mut live = 0u8;
    for (k, &zn) in zs.iter().enumerate() {
        for (j, &yn) in ys.iter().enumerate() {
            let row = (zn * dim + yn) * dim;
            for (i, &xn) in xs.iter().enumerate() {
                if i == 1 && j == 1 && k == 1 {
                    continue;
                }
                live += u8::from(cells[row + xn] != 0);
            }
        }
    }
    live
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_create_grid() {
        let grid = Grid::new(8).unwrap();
        assert_eq!(grid.dimension(), 8);
        assert_eq!(grid.len(), 512);
        assert_eq!(grid.max_distance(), 48.0);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Grid::new(0),
            Err(GridError::InvalidDimension { dimension: 0, .. })
        ));
        // 6^3 = 216 is not a multiple of 16
        assert!(matches!(
            Grid::new(6),
            Err(GridError::InvalidDimension { dimension: 6, .. })
        ));
        // A single shard accepts any non-zero dimension
        assert!(Grid::with_shard_count(6, 1).is_ok());
        assert!(Grid::with_shard_count(255, 1).is_ok());
        assert!(matches!(
            Grid::with_shard_count(4, 0),
            Err(GridError::InvalidShardCount(0))
        ));
    }

    #[test]
    fn test_resize() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(1, 2, 3, 1);

        grid.resize(8).unwrap();
        assert_eq!(grid.dimension(), 8);
        assert_eq!(grid.len(), 512);
        assert_eq!(grid.snapshot.len(), 512);
        assert_eq!(grid.max_distance(), 48.0);
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn test_failed_resize_keeps_grid() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(0, 0, 0, 2);

        assert!(grid.resize(6).is_err());
        assert_eq!(grid.dimension(), 4);
        assert_eq!(grid.len(), 64);
        assert_eq!(grid.get(0, 0, 0), 2);
    }

    #[test]
    fn test_index_of() {
        let grid = Grid::new(4).unwrap();
        assert_eq!(grid.idx(0, 0, 0), 0);
        assert_eq!(grid.idx(3, 3, 3), 63);
        assert_eq!(grid.idx(1, 0, 0), 1);
        assert_eq!(grid.idx(0, 1, 0), 4);
        assert_eq!(grid.idx(0, 0, 1), 16);
        assert_eq!(grid.reverse_idx(16 + 4 + 1), [1, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn test_out_of_range_coordinate_panics() {
        let grid = Grid::new(4).unwrap();
        let _ = grid.idx(4, 0, 0);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut grid = Grid::new(4).unwrap();
        assert_eq!(grid.set(1, 1, 1, 3), 0);
        assert_eq!(grid.set(1, 1, 1, 1), 3);
        assert_eq!(grid.get(1, 1, 1), 1);
    }

    #[test]
    fn test_count_neighbours_interior() {
        let mut grid = Grid::new(8).unwrap();
        grid.set(4, 4, 4, 1);
        grid.set(3, 4, 4, 1);
        grid.set(5, 4, 4, 3);
        grid.set(4, 3, 4, 1);
        grid.set(4, 5, 4, 2);

        // Decaying neighbours count as live
        assert_eq!(grid.count_neighbours(4, 4, 4), 4);
        assert_eq!(grid.count_neighbours(3, 4, 4), 3);
        assert_eq!(grid.count_neighbours(0, 0, 0), 0);
    }

    #[test]
    fn test_count_neighbours_full_block() {
        let mut grid = Grid::new(8).unwrap();
        for z in 2..5 {
            for y in 2..5 {
                for x in 2..5 {
                    grid.set(x, y, z, 1);
                }
            }
        }
        assert_eq!(grid.count_neighbours(3, 3, 3), 26);
    }

    #[test]
    fn test_toroidal_wrap_every_neighbour() {
        // Each of the 26 wrapped positions around the origin must be seen
        let mut checked = 0;
        for dz in [3u8, 0, 1] {
            for dy in [3u8, 0, 1] {
                for dx in [3u8, 0, 1] {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    let mut grid = Grid::new(4).unwrap();
                    grid.set(dx, dy, dz, 1);
                    assert_eq!(
                        grid.count_neighbours(0, 0, 0),
                        1,
                        "neighbour ({dx}, {dy}, {dz}) not reached from origin"
                    );
                    checked += 1;
                }
            }
        }
        assert_eq!(checked, 26);
    }

    #[test]
    fn test_wrap_is_symmetric() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(0, 0, 0, 1);
        grid.set(3, 3, 3, 1);
        assert_eq!(grid.count_neighbours(0, 0, 0), 1);
        assert_eq!(grid.count_neighbours(3, 3, 3), 1);
        // y = 2 is two steps from 0 and x = 1 two steps from 3
        assert_eq!(grid.count_neighbours(1, 2, 1), 0);
    }

    #[test]
    fn test_bijection_small_dimensions() {
        for dimension in 1u8..=12 {
            let grid = Grid::with_shard_count(dimension, 1).unwrap();
            let mut seen = vec![false; grid.len()];
            for z in 0..dimension {
                for y in 0..dimension {
                    for x in 0..dimension {
                        let idx = grid.idx(x, y, z);
                        assert!(!seen[idx]);
                        seen[idx] = true;
                        assert_eq!(grid.reverse_idx(idx), [x, y, z]);
                    }
                }
            }
            assert!(seen.into_iter().all(|s| s));
        }
    }

    proptest! {
        #[test]
        fn prop_idx_roundtrip(dimension in 1u8..=255, a in any::<u8>(), b in any::<u8>(), c in any::<u8>()) {
            let (x, y, z) = (a % dimension, b % dimension, c % dimension);
            let idx = index_of(dimension, x, y, z);
            prop_assert!(idx < usize::from(dimension).pow(3));
            prop_assert_eq!(coords_of(dimension, idx), [x, y, z]);
        }
    }
}
