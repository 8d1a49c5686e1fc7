//! Parallel extraction of renderable points from live cells.

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

use super::grid::coords_of;
use super::{CellState, Grid};
use crate::schema::{Rgb, Rule};

/// Cell position in grid coordinates.
pub type Point = [f32; 3];

/// Interleaved vertex for a single-buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Point,
    pub color: Rgb,
}

/// Positions and colours of every live cell, paired by list index.
///
/// The order of cells is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub positions: Vec<Point>,
    pub colors: Vec<Rgb>,
}

impl Extraction {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Number of extracted cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as raw bytes for a vertex buffer.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colours as raw bytes for a vertex buffer.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Pair positions with colours.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(&position, &color)| Vertex { position, color })
            .collect()
    }

    fn append(&mut self, mut other: Extraction) {
        self.positions.append(&mut other.positions);
        self.colors.append(&mut other.colors);
    }
}

impl Grid {
    /// Extract every live cell with its colour.
    ///
    /// `cell_color` receives `(max_distance, dimension, state, x, y, z)`.
    /// Shards are extracted in parallel and concatenated.
    pub fn draw<F>(&self, cell_color: F) -> Extraction
    where
        F: Fn(f32, u8, CellState, u8, u8, u8) -> Rgb + Sync,
    {
        let dimension = self.dimension;
        let max_distance = self.max_distance();
        let plan = self.shards;

        let shards: Vec<Extraction> = self
            .cells
            .par_chunks(plan.shard_len())
            .enumerate()
            .map(|(shard, cells)| {
                let offset = plan.range(shard).start;
                let mut local = Extraction::with_capacity(cells.len() / 4);
                for (i, &state) in cells.iter().enumerate() {
                    if state == 0 {
                        continue;
                    }
                    let [x, y, z] = coords_of(dimension, offset + i);
                    local
                        .positions
                        .push([f32::from(x), f32::from(y), f32::from(z)]);
                    local
                        .colors
                        .push(cell_color(max_distance, dimension, state, x, y, z));
                }
                local
            })
            .collect();

        let total = shards.iter().map(Extraction::len).sum();
        let mut extraction = Extraction::with_capacity(total);
        for shard in shards {
            extraction.append(shard);
        }
        extraction
    }

    /// Extract using the rule's palette.
    pub fn draw_rule(&self, rule: &Rule) -> Extraction {
        self.draw(|max_distance, dimension, state, x, y, z| {
            rule.color(max_distance, dimension, state, x, y, z)
        })
    }
}
