//! Extractor configuration.
//!
//! A `Config` is immutable for the lifetime of an [`crate::Extractor`]
//! instance. Construction only requires a writable cache directory; the
//! remaining knobs have defaults matching the reference behavior.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dom_query::Document;

/// Pluggable publish-date extractor, run on the parsed document before any
/// cleaning takes place.
pub type PublishDateExtractor = Box<dyn Fn(&Document) -> Option<DateTime<Utc>> + Send + Sync>;

/// Pluggable extractor for arbitrary per-site key/value data, run on the
/// parsed document before any cleaning takes place.
pub type AdditionalDataExtractor =
    Box<dyn Fn(&Document) -> Option<HashMap<String, String>> + Send + Sync>;

/// Configuration for an extractor instance.
///
/// # Example
///
/// ```rust
/// use marrow::Config;
///
/// let config = Config::new("/tmp/marrow-cache");
/// assert_eq!(config.min_bytes_for_image, 4500);
/// assert!(config.enable_image_fetching);
/// ```
pub struct Config {
    /// Directory for transient downloaded image files.
    ///
    /// Files are named `{url_hash}_{random}.{ext}` and removed when the
    /// extraction that created them finishes. Concurrent extractions of
    /// *different* URLs are safe; two concurrent extractions of the *same*
    /// URL share a hash prefix and are disambiguated only by the random
    /// component of the filename.
    pub cache_directory: PathBuf,

    /// Minimum byte size for a candidate image. Smaller images (author
    /// avatars, icons) are dropped during the big-image search.
    ///
    /// Default: `4500`
    pub min_bytes_for_image: u64,

    /// Set to `false` to skip the best-image search entirely.
    ///
    /// Default: `true`
    pub enable_image_fetching: bool,

    /// Optional publish-date extractor. The default extracts nothing.
    pub publish_date_extractor: Option<PublishDateExtractor>,

    /// Optional additional-data extractor. The default extracts nothing.
    pub additional_data_extractor: Option<AdditionalDataExtractor>,
}

impl Config {
    /// Creates a configuration with default knobs for the given cache
    /// directory.
    pub fn new(cache_directory: impl Into<PathBuf>) -> Self {
        Self {
            cache_directory: cache_directory.into(),
            min_bytes_for_image: 4500,
            enable_image_fetching: true,
            publish_date_extractor: None,
            additional_data_extractor: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cache_directory", &self.cache_directory)
            .field("min_bytes_for_image", &self.min_bytes_for_image)
            .field("enable_image_fetching", &self.enable_image_fetching)
            .field(
                "publish_date_extractor",
                &self.publish_date_extractor.as_ref().map(|_| "<fn>"),
            )
            .field(
                "additional_data_extractor",
                &self.additional_data_extractor.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}
