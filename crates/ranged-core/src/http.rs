//! libcurl handle setup and response header collection shared by the probe
//! and the range fetcher.

use std::str;
use std::time::Duration;

/// Transport options applied to every request for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Hard limit on a whole request; bounds how long a `read_at` can block.
    pub request_timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(300),
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// New easy handle for `url` with redirects and timeouts from `opts`.
pub(crate) fn easy_for(url: &str, opts: &HttpOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    if let Some(agent) = &opts.user_agent {
        easy.useragent(agent)?;
    }
    Ok(easy)
}

/// Header callback body: collects header lines of the final response only.
///
/// libcurl reports the headers of every response in a redirect chain; a new
/// status line starts a new response, so earlier lines are dropped.
pub(crate) fn push_header_line(lines: &mut Vec<String>, data: &[u8]) {
    let Ok(s) = str::from_utf8(data) else {
        return;
    };
    let line = s.trim_end();
    if line.starts_with("HTTP/") {
        lines.clear();
    }
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}

/// Value of the first header named `name` (case-insensitive), trimmed.
pub(crate) fn header_value<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| {
        let (n, v) = line.split_once(':')?;
        n.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}
