//! Parallel single-tick state transition.

use rayon::prelude::*;

use super::grid::{coords_of, count_live_neighbours};
use super::{CellState, Grid};
use crate::schema::Rule;

/// Next state of a cell.
///
/// Only dead (0) and fully alive (1) cells consult the rule; every state
/// above 1 decays by one regardless of its neighbours. `count` is only
/// evaluated when needed.
#[inline]
pub fn transition(state: CellState, rule: &Rule, count: impl Fn() -> u8) -> CellState {
    match state {
        0 if rule.is_born(count()) => rule.newborn_state(),
        1 if !rule.survives(count()) => 0,
        s if s > 1 => s - 1,
        s => s,
    }
}

impl Grid {
    /// Advance every cell by one tick.
    ///
    /// Neighbour counts are read from a snapshot taken before any cell
    /// changes. Each shard writes only its own index range, and the call
    /// returns once all shards have finished.
    ///
    /// `rule` must pass [`Rule::validate`]; a state count below 1 makes
    /// the newborn state underflow.
    pub fn update(&mut self, rule: &Rule) {
        debug_assert!(rule.validate().is_ok(), "update called with invalid rule {rule:?}");

        self.snapshot.copy_from_slice(&self.cells);

        let dimension = self.dimension;
        let snapshot = self.snapshot.as_slice();
        let shards = self.shards;

        self.cells
            .par_chunks_mut(shards.shard_len())
            .enumerate()
            .for_each(|(shard, cells)| {
                let range = shards.range(shard);
                debug_assert_eq!(range.len(), cells.len());
                update_shard(snapshot, dimension, rule, range.start, cells);
            });
    }
}

fn update_shard(
    snapshot: &[CellState],
    dimension: u8,
    rule: &Rule,
    offset: usize,
    cells: &mut [CellState],
) {
    for (i, cell) in cells.iter_mut().enumerate() {
        let idx = offset + i;
        *cell = transition(snapshot[idx], rule, || {
            let [x, y, z] = coords_of(dimension, idx);
            count_live_neighbours(snapshot, dimension, x, y, z)
        });
    }
}
