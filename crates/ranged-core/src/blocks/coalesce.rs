//! Decide which covering blocks still need fetching.

use std::ops::Range;

use super::cache::BlockCache;
use super::range::{BlockLayout, ByteRangeRequest};

/// Ranges to request for every block in `blocks` not present in `cache`,
/// in ascending block order.
///
/// The check runs under the shared lock but the answer is only a snapshot:
/// a concurrent caller may decide the same block is missing and fetch it too.
/// Order must be preserved downstream; multipart parts are matched to it 1:1.
pub fn missing_ranges(
    layout: &BlockLayout,
    blocks: Range<u64>,
    cache: &BlockCache,
) -> Vec<ByteRangeRequest> {
    let view = cache.read();
    blocks
        .filter(|&index| !view.contains(index))
        .filter_map(|index| layout.request_for(index))
        .collect()
}
