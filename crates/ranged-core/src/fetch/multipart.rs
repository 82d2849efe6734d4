//! `Content-Type` parsing and `multipart/byteranges` body splitting.

use mime::Mime;

use crate::error::ParseError;

/// Parse a `Content-Type` value such as
/// `multipart/byteranges; boundary="3d6b6a416f9b5"`.
pub(crate) fn parse_media_type(value: &str) -> Result<Mime, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::ContentType(value.to_string()))
}

pub(crate) fn is_multipart_byteranges(mt: &Mime) -> bool {
    mt.type_() == mime::MULTIPART && mt.subtype() == "byteranges"
}

/// `boundary` parameter with any surrounding quotes removed.
pub(crate) fn boundary(mt: &Mime) -> Result<&str, ParseError> {
    match mt.get_param(mime::BOUNDARY).map(|b| b.as_str().trim_matches('"')) {
        Some(b) if !b.is_empty() => Ok(b),
        _ => Err(ParseError::MissingBoundary),
    }
}

/// One decoded body part.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Part<'a> {
    pub headers: Vec<(String, String)>,
    pub body: &'a [u8],
}

impl Part<'_> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Split a multipart body into its parts, in order.
///
/// Accepts a preamble, transport padding after delimiters, and bare LF line
/// endings. A body that ends after a delimiter without the closing `--` is
/// accepted; a part whose body has no following delimiter is truncated.
pub(crate) fn split_parts<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<Part<'a>>, ParseError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut pos = first_delimiter(body, delimiter).ok_or(ParseError::MissingDelimiter)?;
    let mut parts = Vec::new();

    loop {
        pos += delimiter.len();
        let rest = &body[pos..];
        if rest.starts_with(b"--") || rest.is_empty() {
            break;
        }
        let part = parts.len();

        // Rest of the delimiter line: optional padding, then line end.
        let line_end = find(rest, b"\n").ok_or(ParseError::TruncatedPart { part })?;
        if !rest[..line_end]
            .iter()
            .all(|&b| b == b' ' || b == b'\t' || b == b'\r')
        {
            return Err(ParseError::PartHeaders { part });
        }
        pos += line_end + 1;

        let mut headers = Vec::new();
        loop {
            let rest = &body[pos..];
            let nl = find(rest, b"\n").ok_or(ParseError::TruncatedPart { part })?;
            let line = trim_cr(&rest[..nl]);
            pos += nl + 1;
            if line.is_empty() {
                break;
            }
            let line = std::str::from_utf8(line).map_err(|_| ParseError::PartHeaders { part })?;
            let (k, v) = line.split_once(':').ok_or(ParseError::PartHeaders { part })?;
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }

        // Body runs up to the line break preceding the next delimiter.
        let rest = &body[pos..];
        let mut marker = Vec::with_capacity(delimiter.len() + 1);
        marker.push(b'\n');
        marker.extend_from_slice(delimiter);
        let at = find(rest, &marker).ok_or(ParseError::TruncatedPart { part })?;
        let part_body = trim_cr(&rest[..at]);
        parts.push(Part {
            headers,
            body: part_body,
        });
        pos += at + 1;
    }

    Ok(parts)
}

/// Offset of the first delimiter that starts the body or a line.
fn first_delimiter(body: &[u8], delimiter: &[u8]) -> Option<usize> {
    if body.starts_with(delimiter) {
        return Some(0);
    }
    let mut marker = Vec::with_capacity(delimiter.len() + 1);
    marker.push(b'\n');
    marker.extend_from_slice(delimiter);
    find(body, &marker).map(|i| i + 1)
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// First byte offset of a `Content-Range: bytes start-end/total` value.
pub(crate) fn content_range_start(value: &str) -> Option<u64> {
    let rest = value.trim().strip_prefix("bytes")?.trim_start();
    let (start, _) = rest.split_once('-')?;
    start.trim().parse().ok()
}
