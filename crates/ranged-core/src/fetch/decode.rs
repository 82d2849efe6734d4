//! Map a ranged GET response back onto the requested blocks.

use super::multipart::{
    boundary, content_range_start, is_multipart_byteranges, parse_media_type, split_parts,
};
use super::transfer::RawResponse;
use crate::blocks::ByteRangeRequest;
use crate::error::{Error, FetchError, ParseError};

/// Blocks recovered from one response, in request order.
///
/// `blocks.len()` may be less than the number of ranges requested when the
/// server sent fewer parts; the caller decides what that means.
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    pub blocks: Vec<(u64, Vec<u8>)>,
}

pub(crate) fn decode(response: &RawResponse, ranges: &[ByteRangeRequest]) -> Result<Decoded, Error> {
    let media_type = response
        .header("content-type")
        .map(parse_media_type)
        .transpose()?;

    match media_type {
        Some(mt) if is_multipart_byteranges(&mt) => {
            decode_multipart(&response.body, boundary(&mt)?, ranges)
        }
        // 200: the server ignored Range and sent the whole representation.
        _ if response.status == 200 => decode_full_body(&response.body, ranges),
        _ => decode_single_part(response, ranges),
    }
}

fn decode_multipart(body: &[u8], boundary: &str, ranges: &[ByteRangeRequest]) -> Result<Decoded, Error> {
    let parts = split_parts(body, boundary)?;
    if parts.len() > ranges.len() {
        tracing::warn!(
            parts = parts.len(),
            requested = ranges.len(),
            "ignoring surplus multipart parts"
        );
    }

    let mut decoded = Decoded::default();
    for (i, (part, range)) in parts.iter().zip(ranges).enumerate() {
        if let Some(value) = part.header("content-range") {
            let actual = content_range_start(value).ok_or(ParseError::PartHeaders { part: i })?;
            if actual != range.start {
                return Err(ParseError::RangeMismatch {
                    part: i,
                    expected: range.start,
                    actual,
                }
                .into());
            }
        }
        decoded.blocks.push((range.block, take_block(part.body, range)?));
    }
    Ok(decoded)
}

fn decode_full_body(body: &[u8], ranges: &[ByteRangeRequest]) -> Result<Decoded, Error> {
    let mut decoded = Decoded::default();
    for range in ranges {
        let from = usize::try_from(range.start).unwrap_or(usize::MAX).min(body.len());
        decoded.blocks.push((range.block, take_block(&body[from..], range)?));
    }
    Ok(decoded)
}

/// A plain 206 body answers the first requested range only.
fn decode_single_part(response: &RawResponse, ranges: &[ByteRangeRequest]) -> Result<Decoded, Error> {
    let Some(first) = ranges.first() else {
        return Ok(Decoded::default());
    };
    if let Some(actual) = response.header("content-range").and_then(content_range_start) {
        if actual != first.start {
            return Err(ParseError::RangeMismatch {
                part: 0,
                expected: first.start,
                actual,
            }
            .into());
        }
    }
    Ok(Decoded {
        blocks: vec![(first.block, take_block(&response.body, first)?)],
    })
}

/// Exactly `range.len()` leading bytes of `data`; fewer is a short body.
fn take_block(data: &[u8], range: &ByteRangeRequest) -> Result<Vec<u8>, FetchError> {
    let expected = range.len();
    match usize::try_from(expected) {
        Ok(n) if n <= data.len() => Ok(data[..n].to_vec()),
        _ => Err(FetchError::ShortBody {
            block: range.block,
            expected,
            received: data.len() as u64,
        }),
    }
}
