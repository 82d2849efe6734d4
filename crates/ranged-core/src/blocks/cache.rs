//! Shared, write-once block cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Block index -> block bytes for one resource.
///
/// Grows monotonically. Many readers may hold the lock at once; inserts take
/// the exclusive lock only for the in-memory mutation.
#[derive(Debug, Default)]
pub struct BlockCache {
    blocks: RwLock<HashMap<u64, Box<[u8]>>>,
}

/// Read-locked view of the cache. Holding it blocks inserts, so keep it short
/// and never across network I/O.
pub struct CacheView<'a> {
    guard: RwLockReadGuard<'a, HashMap<u64, Box<[u8]>>>,
}

impl CacheView<'_> {
    pub fn contains(&self, index: u64) -> bool {
        self.guard.contains_key(&index)
    }

    pub fn get(&self, index: u64) -> Option<&[u8]> {
        self.guard.get(&index).map(|b| &b[..])
    }
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the shared lock.
    ///
    /// Blocks are write-once, so a writer that panicked mid-batch cannot
    /// have left a torn block behind; poisoning is ignored.
    pub fn read(&self) -> CacheView<'_> {
        CacheView {
            guard: self.blocks.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Insert a batch of fetched blocks under one exclusive lock.
    ///
    /// An index that is already present keeps its existing bytes; a
    /// concurrent duplicate fetch carries identical content anyway.
    /// Returns the number of blocks newly stored.
    pub fn insert_batch(&self, batch: Vec<(u64, Vec<u8>)>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let mut blocks = self.blocks.write().unwrap_or_else(PoisonError::into_inner);
        let mut stored = 0;
        for (index, data) in batch {
            blocks.entry(index).or_insert_with(|| {
                stored += 1;
                data.into_boxed_slice()
            });
        }
        stored
    }

    /// Number of cached blocks.
    pub fn len(&self) -> usize {
        self.read().guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
