//! Blocking HTTP fetch layer.
//!
//! Redirects are followed manually: automatic redirect handling breaks on
//! cross-protocol hops and loses track of the final URL, so 301/302 responses
//! are resolved against the current URL and retried until a non-redirect
//! status arrives.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::encoding;
use crate::error::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.4 (KHTML, like Gecko) Chrome/22.0.1229.94 Safari/537.4";
const ACCEPT_CONTENT: &str = "application/xml,application/xhtml+xml,text/html,application/javascript;q=0.9,text/plain;q=0.8,image/png,*/*;q=0.5";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on document size; anything larger is not an article.
const MAX_BYTES: u64 = 15 * 1024 * 1024;

/// Backstop against redirect cycles, which would otherwise loop forever.
const MAX_REDIRECTS: usize = 20;

/// Content types accepted as parseable documents.
const DOCUMENT_MIME_TYPES: &[&str] = &["text/html", "text/xml", "application/xml"];

/// Size and MIME type of a remote resource, read from headers only.
#[derive(Debug, Default, Clone)]
pub struct ContentInfo {
    /// Content-Length, or 0 when the server did not report one.
    pub size: u64,

    /// Content-Type header value, or empty.
    pub mime_type: String,
}

/// Byte- and metadata-level access to remote media, separated out so the
/// image search can run against a fake in tests.
pub trait MediaProbe {
    /// Header-only probe; total, returns an empty result on any failure.
    fn content_info(&self, url: &str) -> ContentInfo;

    /// Full body download; `None` on any failure.
    fn image_bytes(&self, url: &str) -> Option<Vec<u8>>;
}

/// The production fetcher.
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher;

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Retrieves a document, following redirects manually, and decodes it to
    /// UTF-8.
    pub fn fetch_html(&self, url: &str) -> Result<String> {
        let (response, final_url) = open(url)?;

        let status = response.status();
        if let Some(length) = response.content_length() {
            if length > MAX_BYTES {
                return Err(Error::TooLarge(length));
            }
        }
        if status != StatusCode::OK {
            return Err(Error::HttpStatus(status.as_u16(), final_url.to_string()));
        }

        let content_type = header_str(&response, CONTENT_TYPE);
        let Some(content_type) = content_type else {
            return Err(Error::NotContent);
        };
        if !DOCUMENT_MIME_TYPES.iter().any(|m| content_type.contains(m)) {
            return Err(Error::NotContent);
        }

        let charset = encoding::charset_from_content_type(&content_type).map(ToString::to_string);
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(Error::NotContent);
        }
        if bytes.len() as u64 > MAX_BYTES {
            return Err(Error::TooLarge(bytes.len() as u64));
        }

        Ok(encoding::decode_response(&bytes, charset.as_deref()))
    }
}

impl MediaProbe for HttpFetcher {
    fn content_info(&self, url: &str) -> ContentInfo {
        match open(url) {
            Ok((response, _)) => ContentInfo {
                size: response.content_length().unwrap_or(0),
                mime_type: header_str(&response, CONTENT_TYPE).unwrap_or_default(),
            },
            Err(err) => {
                debug!(url, %err, "content info probe failed");
                ContentInfo::default()
            }
        }
    }

    fn image_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let (response, _) = open(url).ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.bytes().ok().map(|b| b.to_vec())
    }
}

/// Opens a connection, resolving 301/302 hops until a non-redirect status.
/// Returns the response together with the URL it finally came from.
fn open(url: &str) -> Result<(Response, Url)> {
    let client = build_client()?;

    let mut current = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
    for _ in 0..MAX_REDIRECTS {
        let response = client.get(current.clone()).send()?;

        match response.status() {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                let Some(location) = header_str(&response, LOCATION) else {
                    return Ok((response, current));
                };
                // relative Location headers are legal and common
                current = current
                    .join(&location)
                    .map_err(|_| Error::InvalidUrl(location.clone()))?;
                debug!(target_url = %current, "following redirect");
            }
            _ => return Ok((response, current)),
        }
    }

    Err(Error::RedirectLoop(url.to_string()))
}

fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_CONTENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-us"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(READ_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(headers)
        .build()?;

    Ok(client)
}

fn header_str(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}
