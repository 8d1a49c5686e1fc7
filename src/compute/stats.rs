//! Grid statistics and operation timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Grid;

/// Population statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub total_cells: usize,
    /// Cells in any non-dead state.
    pub live_cells: usize,
    /// Cells in state 1.
    pub alive_cells: usize,
    /// Cells in states above 1.
    pub decaying_cells: usize,
    pub live_fraction: f32,
}

impl SimulationStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut alive_cells = 0usize;
        let mut decaying_cells = 0usize;

        for &state in grid.cells() {
            match state {
                0 => {}
                1 => alive_cells += 1,
                _ => decaying_cells += 1,
            }
        }

        let total_cells = grid.len();
        let live_cells = alive_cells + decaying_cells;

        Self {
            total_cells,
            live_cells,
            alive_cells,
            decaying_cells,
            live_fraction: live_cells as f32 / total_cells as f32,
        }
    }
}

/// Accumulated wall time spent in `update` and `draw`.
#[derive(Debug, Clone, Default)]
pub struct Timings {
    pub update_count: u64,
    pub update_time: Duration,
    pub draw_count: u64,
    pub draw_time: Duration,
}

impl Timings {
    pub fn record_update(&mut self, elapsed: Duration) {
        self.update_count += 1;
        self.update_time += elapsed;
    }

    pub fn record_draw(&mut self, elapsed: Duration) {
        self.draw_count += 1;
        self.draw_time += elapsed;
    }

    /// Mean update time in milliseconds, `None` before the first update.
    pub fn average_update_ms(&self) -> Option<f64> {
        average_ms(self.update_time, self.update_count)
    }

    /// Mean draw time in milliseconds, `None` before the first draw.
    pub fn average_draw_ms(&self) -> Option<f64> {
        average_ms(self.draw_time, self.draw_count)
    }

    /// Log average timings at info level.
    pub fn log_summary(&self) {
        if let Some(ms) = self.average_update_ms() {
            log::info!("update: {:.3} ms avg over {} ticks", ms, self.update_count);
        }
        if let Some(ms) = self.average_draw_ms() {
            log::info!("draw: {:.3} ms avg over {} frames", ms, self.draw_count);
        }
    }
}

fn average_ms(total: Duration, count: u64) -> Option<f64> {
    (count > 0).then(|| total.as_secs_f64() * 1000.0 / count as f64)
}
