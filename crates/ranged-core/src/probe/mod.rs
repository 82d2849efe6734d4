//! HTTP HEAD probing.
//!
//! Uses the curl crate (libcurl) to learn the resource size from
//! `Content-Length` and whether the server advertises `Accept-Ranges: bytes`.
//! Runs once, when a [`crate::RangeReader`] is opened.

mod parse;

use crate::error::{Error, ProbeError};
use crate::http::{easy_for, push_header_line, HttpOptions};

/// Result of a HEAD request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
}

impl HeadResult {
    /// Size of the resource; fails if the server did not report one.
    pub fn size(&self) -> Result<u64, ProbeError> {
        self.content_length.ok_or(ProbeError::MissingContentLength)
    }
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. 404 maps to [`Error::ResourceNotFound`]; any other
/// failure is [`Error::Probe`]. Blocks the current thread.
pub fn probe(url: &str, opts: &HttpOptions) -> Result<HeadResult, Error> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = easy_for(url, opts).map_err(ProbeError::Transport)?;
    easy.nobody(true).map_err(ProbeError::Transport)?; // HEAD request

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                push_header_line(&mut headers, data);
                true
            })
            .map_err(ProbeError::Transport)?;
        transfer.perform().map_err(ProbeError::Transport)?;
    }

    let code = easy.response_code().map_err(ProbeError::Transport)?;
    if code == 404 {
        return Err(Error::ResourceNotFound {
            url: url.to_string(),
        });
    }
    if !(200..300).contains(&code) {
        return Err(ProbeError::Http(code).into());
    }

    let head = parse::parse_headers(&headers);
    tracing::debug!(
        url,
        content_length = ?head.content_length,
        accept_ranges = head.accept_ranges,
        "HEAD probe complete"
    );
    Ok(head)
}
