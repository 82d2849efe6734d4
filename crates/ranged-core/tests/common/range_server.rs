//! Minimal HTTP/1.1 server that supports HEAD and multi-range GET for integration tests.
//!
//! Serves a single static body. Responds to HEAD with Content-Length and
//! Accept-Ranges: bytes; responds to GET with one range as a plain 206 and
//! with several ranges as `multipart/byteranges`. Counts requests and records
//! every `Range` header so tests can assert on wire traffic. Options inject
//! failures: 404, GET-only error statuses, collapsed or dropped ranges, and
//! truncated multipart bodies.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const BOUNDARY: &str = "RANGED_TEST_BOUNDARY";

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If true, every request is answered with 404.
    pub not_found: bool,
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, omit `Accept-Ranges: bytes` from HEAD.
    pub advertise_ranges: bool,
    /// If true, a multi-range GET is answered with a plain 206 for the first range only.
    pub collapse_multi: bool,
    /// Upper bound on parts in a multipart answer (drops trailing ranges).
    pub max_parts: Option<usize>,
    /// If set, GET is answered with this status and an empty body; HEAD still succeeds.
    pub get_status: Option<u16>,
    /// If true, a multipart answer stops halfway through the last part's body
    /// with no closing delimiter.
    pub truncate_last_part: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            not_found: false,
            support_ranges: true,
            advertise_ranges: true,
            collapse_multi: false,
            max_parts: None,
            get_status: None,
            truncate_last_part: false,
        }
    }
}

/// Traffic seen by the server.
#[derive(Debug, Default)]
pub struct Stats {
    heads: AtomicUsize,
    gets: AtomicUsize,
    ranges: Mutex<Vec<String>>,
}

impl Stats {
    pub fn heads(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// `Range` header values of all GETs so far, in arrival order.
    pub fn ranges(&self) -> Vec<String> {
        self.ranges.lock().unwrap().clone()
    }
}

pub struct RangeServer {
    pub url: String,
    pub stats: Arc<Stats>,
}

/// Starts a server in a background thread serving `body`. The server runs
/// until the process exits.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let stats = Arc::new(Stats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || handle(stream, &body, opts, &stats));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/resource.bin", port),
        stats,
    }
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn handle(mut stream: TcpStream, body: &[u8], opts: RangeServerOptions, stats: &Stats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let (method, range) = parse_request(&request);
    let total = body.len() as u64;

    if method.eq_ignore_ascii_case("HEAD") {
        stats.heads.fetch_add(1, Ordering::SeqCst);
        if opts.not_found {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            return;
        }
        let accept_ranges = if opts.advertise_ranges && opts.support_ranges {
            "Accept-Ranges: bytes\r\n"
        } else {
            ""
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
            total, accept_ranges
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }
    stats.gets.fetch_add(1, Ordering::SeqCst);
    if let Some(value) = &range {
        stats.ranges.lock().unwrap().push(value.clone());
    }
    if opts.not_found {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    if let Some(code) = opts.get_status {
        write_response(&mut stream, &format!("{} Error", code), "text/plain", None, &[]);
        return;
    }

    let ranges = range
        .as_deref()
        .map(|v| parse_ranges(v, total))
        .unwrap_or_default();

    if !opts.support_ranges || ranges.is_empty() {
        write_response(&mut stream, "200 OK", "application/octet-stream", None, body);
        return;
    }
    if ranges.iter().any(|&(s, e)| s > e) {
        let content_range = format!("bytes */{}", total);
        write_response(
            &mut stream,
            "416 Range Not Satisfiable",
            "text/plain",
            Some(&content_range),
            &[],
        );
        return;
    }

    if ranges.len() == 1 || opts.collapse_multi {
        let (start, end) = ranges[0];
        let content_range = format!("bytes {}-{}/{}", start, end, total);
        write_response(
            &mut stream,
            "206 Partial Content",
            "application/octet-stream",
            Some(&content_range),
            &body[start as usize..=end as usize],
        );
        return;
    }

    let parts = opts.max_parts.unwrap_or(ranges.len()).min(ranges.len());
    let mut payload = Vec::new();
    for (i, &(start, end)) in ranges[..parts].iter().enumerate() {
        payload.extend_from_slice(
            format!(
                "--{}\r\nContent-Type: application/octet-stream\r\nContent-Range: bytes {}-{}/{}\r\n\r\n",
                BOUNDARY, start, end, total
            )
            .as_bytes(),
        );
        let part = &body[start as usize..=end as usize];
        if opts.truncate_last_part && i + 1 == parts {
            payload.extend_from_slice(&part[..part.len() / 2]);
            break;
        }
        payload.extend_from_slice(part);
        payload.extend_from_slice(b"\r\n");
    }
    if !opts.truncate_last_part {
        payload.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    }
    let content_type = format!("multipart/byteranges; boundary={}", BOUNDARY);
    write_response(&mut stream, "206 Partial Content", &content_type, None, &payload);
}

fn write_response(
    stream: &mut TcpStream,
    status: &str,
    content_type: &str,
    content_range: Option<&str>,
    payload: &[u8],
) {
    let content_range = content_range
        .map(|v| format!("Content-Range: {}\r\n", v))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        content_type,
        payload.len(),
        content_range
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload);
}

/// Returns (method, optional raw `Range` header value).
fn parse_request(request: &str) -> (&str, Option<String>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                range = Some(value.trim().to_string());
            }
        }
    }
    (method, range)
}

/// Parses `bytes=a-b,c-d` into inclusive pairs, clamping ends to the body.
fn parse_ranges(value: &str, total: u64) -> Vec<(u64, u64)> {
    let Some(list) = value.strip_prefix("bytes=") else {
        return Vec::new();
    };
    list.split(',')
        .filter_map(|spec| {
            let (a, b) = spec.trim().split_once('-')?;
            let start = a.trim().parse::<u64>().ok()?;
            let end = match b.trim() {
                "" => total.saturating_sub(1),
                e => e.parse::<u64>().ok()?.min(total.saturating_sub(1)),
            };
            Some((start, end))
        })
        .collect()
}
