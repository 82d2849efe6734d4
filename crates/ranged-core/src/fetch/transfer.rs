//! One multi-range HTTP GET, buffered in memory.

use crate::error::FetchError;
use crate::http::{easy_for, header_value, push_header_line, HttpOptions};

/// Status, final header lines and full body of a GET.
#[derive(Debug, Default)]
pub(crate) struct RawResponse {
    pub status: u32,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// GET `url` with `Range: bytes=<range_list>`.
///
/// Any status outside 2xx is a [`FetchError::Http`].
pub(crate) fn get_ranges(
    url: &str,
    range_list: &str,
    opts: &HttpOptions,
) -> Result<RawResponse, FetchError> {
    let mut response = RawResponse::default();

    let mut easy = easy_for(url, opts).map_err(FetchError::Transport)?;
    // libcurl sends this as `Range: bytes=<range_list>`.
    easy.range(range_list).map_err(FetchError::Transport)?;

    {
        let headers = &mut response.headers;
        let body = &mut response.body;
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                push_header_line(headers, data);
                true
            })
            .map_err(FetchError::Transport)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(FetchError::Transport)?;
        transfer.perform().map_err(FetchError::Transport)?;
    }

    response.status = easy.response_code().map_err(FetchError::Transport)?;
    if !(200..300).contains(&response.status) {
        return Err(FetchError::Http(response.status));
    }
    Ok(response)
}
