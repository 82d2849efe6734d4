//! Block layout, cache and coalescing.
//!
//! Splits a resource into fixed-size blocks, keeps fetched blocks in a
//! shared write-once cache, and works out which block ranges a read still
//! has to fetch.

mod cache;
mod coalesce;
mod range;

pub use cache::{BlockCache, CacheView};
pub use coalesce::missing_ranges;
pub use range::{range_list, BlockLayout, ByteRangeRequest, DEFAULT_BLOCK_SIZE};
