//! Block geometry and byte range requests.

use std::fmt;
use std::num::NonZeroU64;
use std::ops::Range;

/// Default block size: 128 KiB.
pub const DEFAULT_BLOCK_SIZE: u64 = 128 * 1024;

/// One block to request: inclusive byte range `[start, end]` of block `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRangeRequest {
    /// Block index this range fills.
    pub block: u64,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (inclusive), already clipped to `size - 1`.
    pub end: u64,
}

impl ByteRangeRequest {
    /// Number of bytes this range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Formats as `start-end`, the form used inside a `Range: bytes=` header.
impl fmt::Display for ByteRangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Range set for a single GET: `s1-e1,s2-e2,...` in request order, no spaces.
/// This is the value after `bytes=`.
pub fn range_list(ranges: &[ByteRangeRequest]) -> String {
    ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Fixed block layout of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    size: u64,
    block_size: u64,
}

impl BlockLayout {
    pub fn new(size: u64, block_size: NonZeroU64) -> Self {
        Self {
            size,
            block_size: block_size.get(),
        }
    }

    /// Total resource size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Number of blocks in the resource (last one may be short).
    pub fn block_count(&self) -> u64 {
        self.size.div_ceil(self.block_size)
    }

    /// Block indices fully covering `[offset, offset + len)`.
    ///
    /// Empty when `len` is 0. Does not clamp to the resource size; callers
    /// clamp the window first.
    pub fn covering_blocks(&self, offset: u64, len: u64) -> Range<u64> {
        if len == 0 {
            return 0..0;
        }
        let first = offset / self.block_size;
        let last = (offset + len).div_ceil(self.block_size);
        first..last
    }

    /// Byte range of block `index`, end clipped to `size - 1`.
    ///
    /// Returns `None` for blocks that start at or past the end of the resource.
    pub fn request_for(&self, index: u64) -> Option<ByteRangeRequest> {
        let start = index.checked_mul(self.block_size)?;
        if start >= self.size {
            return None;
        }
        let end = start
            .saturating_add(self.block_size - 1)
            .min(self.size - 1);
        Some(ByteRangeRequest {
            block: index,
            start,
            end,
        })
    }

    /// Length a stored block `index` must have.
    pub fn block_len(&self, index: u64) -> u64 {
        self.request_for(index).map_or(0, |r| r.len())
    }
}
