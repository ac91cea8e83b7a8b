//! Error types for marrow.
//!
//! Only fetch-class failures abort an extraction; every per-node or
//! per-image-candidate failure inside the pipeline is swallowed locally and
//! the element simply contributes nothing.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response advertised a Content-Length over the 15 MiB cap.
    #[error("response too large: {0} bytes")]
    TooLarge(u64),

    /// The response body was empty or the Content-Type was not HTML/XML.
    #[error("response is not HTML or XML content")]
    NotContent,

    /// The final response carried a non-200 status.
    #[error("unexpected HTTP status {0} for {1}")]
    HttpStatus(u16, String),

    /// The redirect chain never reached a non-redirect response.
    #[error("too many redirects for {0}")]
    RedirectLoop(String),

    /// Connection, timeout or transport failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local filesystem failure (cache directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
