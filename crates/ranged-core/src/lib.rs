//! Random-access reads over HTTP byte ranges.
//!
//! A [`RangeReader`] probes a URL once with HEAD, then answers `read_at`
//! calls from an in-memory block cache. Missing blocks for a read are fetched
//! with a single GET whose `Range` header lists every one of them; a
//! `multipart/byteranges` answer is split back into blocks.

pub mod blocks;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod probe;
pub mod reader;

pub use error::{Error, ErrorKind, FetchError, ParseError, ProbeError, Result};
pub use http::HttpOptions;
pub use probe::HeadResult;
pub use reader::{LoggingReader, RangeReader, ReadAt, ReadAtCursor, ReaderOptions};
