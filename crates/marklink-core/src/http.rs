//! Blocking HTTP GET used for title pages and oEmbed metadata.
//!
//! Uses the curl crate (libcurl). One easy handle per request, run on the
//! current thread.

use std::sync::LazyLock;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

use crate::error::FetchError;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("marklink/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTIONS: u32 = 10;

/// How far into the body to look for a `<meta>` charset declaration.
const META_SNIFF_LEN: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?([-a-z0-9_:.]+)"#)
        .expect("meta charset pattern is valid")
});

/// Something that can GET a URL and hand back the body as text.
///
/// Implemented by [`CurlClient`]; tests substitute canned responses.
pub trait HttpGet {
    /// GETs `url`, optionally sending an `Accept` header. Non-2xx is an error.
    fn get_text(&self, url: &str, accept: Option<&str>) -> Result<String, FetchError>;
}

/// Curl-backed client carrying the identifying user agent and timeout.
#[derive(Debug, Clone)]
pub struct CurlClient {
    timeout: Duration,
}

impl Default for CurlClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CurlClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn perform(&self, url: &str, accept: Option<&str>) -> Result<Response, curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        // Let libcurl negotiate and decode any content encoding it supports.
        easy.accept_encoding("")?;

        if let Some(accept) = accept {
            let mut list = curl::easy::List::new();
            list.append(&format!("Accept: {accept}"))?;
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        Ok(Response {
            status: easy.response_code()?,
            content_type: easy.content_type()?.map(str::to_string),
            body,
        })
    }
}

struct Response {
    status: u32,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// `charset` parameter of a `Content-Type` value, if any.
fn charset_param(content_type: &str) -> Option<&[u8]> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').as_bytes())
    })
}

/// Charset named by a `<meta charset>` or `http-equiv` tag near the start of `body`.
fn meta_charset(body: &[u8]) -> Option<&[u8]> {
    let head = &body[..body.len().min(META_SNIFF_LEN)];
    META_CHARSET_RE
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_bytes())
}

/// Decodes `body` with the charset from `content_type`, else from a `<meta>`
/// declaration, else as UTF-8. Unknown labels fall back to UTF-8; malformed
/// sequences become U+FFFD.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(Encoding::for_label)
        .or_else(|| meta_charset(body).and_then(Encoding::for_label))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

impl HttpGet for CurlClient {
    fn get_text(&self, url: &str, accept: Option<&str>) -> Result<String, FetchError> {
        tracing::debug!(url, "GET");
        let response = self
            .perform(url, accept)
            .map_err(|e| FetchError::from_curl(url, e))?;
        let status = response.status;
        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        tracing::debug!(
            url,
            status,
            bytes = response.body.len(),
            content_type = response.content_type.as_deref().unwrap_or(""),
            "GET complete"
        );
        Ok(decode_body(response.content_type.as_deref(), &response.body))
    }
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get_text(&self, url: &str, accept: Option<&str>) -> Result<String, FetchError> {
        (**self).get_text(url, accept)
    }
}
