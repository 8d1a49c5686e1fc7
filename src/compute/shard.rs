//! Static partitioning of the flat cell index space into worker shards.

use std::ops::Range;

use super::GridError;

/// Number of shards used when none is configured.
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Equal-size, contiguous, disjoint partition of `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardPlan {
    len: usize,
    shard_count: usize,
}

impl ShardPlan {
    /// Plan `shard_count` shards over `len` cells.
    ///
    /// `len` must be a non-zero multiple of `shard_count`.
    pub fn new(len: usize, shard_count: usize) -> Result<Self, GridError> {
        if shard_count == 0 {
            return Err(GridError::InvalidShardCount(shard_count));
        }
        if len == 0 || len % shard_count != 0 {
            return Err(GridError::UnevenShards { len, shard_count });
        }
        Ok(Self { len, shard_count })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    /// Cells per shard.
    #[inline]
    pub fn shard_len(&self) -> usize {
        self.len / self.shard_count
    }

    /// Index range owned by `shard`.
    pub fn range(&self, shard: usize) -> Range<usize> {
        assert!(
            shard < self.shard_count,
            "shard {shard} out of {}",
            self.shard_count
        );
        let shard_len = self.shard_len();
        shard * shard_len..(shard + 1) * shard_len
    }

    /// All shard ranges in index order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.shard_count).map(|shard| self.range(shard))
    }
}
