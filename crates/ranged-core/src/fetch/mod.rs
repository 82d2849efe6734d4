//! Range fetcher.
//!
//! Issues one HTTP GET naming every missing block range, splits the response
//! (a plain body or `multipart/byteranges`) back into blocks, and stores them
//! in the [`BlockCache`]. No lock is held while the request is in flight.

mod decode;
mod multipart;
mod transfer;

use crate::blocks::{range_list, BlockCache, ByteRangeRequest};
use crate::error::{Error, Result};
use crate::http::HttpOptions;

/// Fetches block ranges of one resource.
#[derive(Debug, Clone)]
pub struct RangeFetcher {
    url: String,
    http: HttpOptions,
}

impl RangeFetcher {
    pub fn new(url: impl Into<String>, http: HttpOptions) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    /// Fetch `ranges` (in coalescer order) into `cache`.
    ///
    /// Empty input performs no request. When the server answers fewer ranges
    /// than requested, the ranges that did arrive are stored and the call
    /// fails with [`Error::IncompleteFetch`].
    pub fn fetch(&self, ranges: &[ByteRangeRequest], cache: &BlockCache) -> Result<()> {
        if ranges.is_empty() {
            return Ok(());
        }

        let list = range_list(ranges);
        tracing::debug!(url = %self.url, ranges = %list, "GET");
        let response = transfer::get_ranges(&self.url, &list, &self.http)?;
        let decoded = decode::decode(&response, ranges)?;

        let received = decoded.blocks.len();
        let stored = cache.insert_batch(decoded.blocks);
        tracing::debug!(
            status = response.status,
            received,
            stored,
            "stored fetched blocks"
        );

        if received < ranges.len() {
            tracing::warn!(
                url = %self.url,
                requested = ranges.len(),
                received,
                "server answered fewer ranges than requested"
            );
            return Err(Error::IncompleteFetch {
                requested: ranges.len(),
                received,
            });
        }
        Ok(())
    }
}
