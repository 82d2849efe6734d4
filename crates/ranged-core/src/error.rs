//! Error taxonomy for probing, fetching and reading.
//!
//! Every network or parse failure surfaces through [`Error`]; nothing is
//! dropped on the floor. Transport failures keep the underlying
//! `curl::Error` as their source so callers can inspect it.

use std::io;
use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by [`crate::RangeReader`] and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// The HEAD probe answered 404.
    #[error("resource not found: {url}")]
    ResourceNotFound { url: String },

    /// The HEAD probe failed for any reason other than 404.
    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),

    /// The ranged GET failed or a body was shorter than its range.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The response framing could not be decoded.
    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),

    /// The server answered fewer ranges than were requested.
    #[error("incomplete fetch: requested {requested} ranges, received {received}")]
    IncompleteFetch { requested: usize, received: usize },

    /// A block required by the copy phase is not cached.
    #[error("block {index} missing from cache after fetch")]
    MissingBlock { index: u64 },
}

/// Flat classification of [`Error`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceNotFound,
    Probe,
    Fetch,
    Parse,
    IncompleteFetch,
    MissingBlock,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Error::Probe(_) => ErrorKind::Probe,
            Error::Fetch(_) => ErrorKind::Fetch,
            Error::Parse(_) => ErrorKind::Parse,
            Error::IncompleteFetch { .. } => ErrorKind::IncompleteFetch,
            Error::MissingBlock { .. } => ErrorKind::MissingBlock,
        }
    }
}

/// Failure of the construction-time HEAD probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HEAD request failed: {0}")]
    Transport(#[source] curl::Error),
    #[error("HEAD returned HTTP {0}")]
    Http(u32),
    #[error("response carried no usable Content-Length")]
    MissingContentLength,
}

/// Failure of a ranged GET.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET request failed: {0}")]
    Transport(#[source] curl::Error),
    #[error("GET returned HTTP {0}")]
    Http(u32),
    #[error("short body for block {block}: expected {expected} bytes, got {received}")]
    ShortBody {
        block: u64,
        expected: u64,
        received: u64,
    },
}

/// Malformed `Content-Type` or multipart framing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed Content-Type: {0:?}")]
    ContentType(String),
    #[error("multipart/byteranges response has no boundary parameter")]
    MissingBoundary,
    #[error("multipart body does not start with its boundary delimiter")]
    MissingDelimiter,
    #[error("part {part} has malformed headers")]
    PartHeaders { part: usize },
    #[error("part {part} is truncated (no closing delimiter)")]
    TruncatedPart { part: usize },
    #[error("part {part} covers bytes from {actual}, expected {expected}")]
    RangeMismatch {
        part: usize,
        expected: u64,
        actual: u64,
    },
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind() {
            ErrorKind::ResourceNotFound => io::ErrorKind::NotFound,
            ErrorKind::IncompleteFetch => io::ErrorKind::UnexpectedEof,
            ErrorKind::Fetch if matches!(e, Error::Fetch(FetchError::ShortBody { .. })) => {
                io::ErrorKind::UnexpectedEof
            }
            ErrorKind::Parse => io::ErrorKind::InvalidData,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}
