//! # marrow
//!
//! Extracts the real article from an arbitrary, noisy HTML document: body
//! text, title, canonical metadata, a representative image and embedded
//! media. No machine learning and no per-site templates — the content is
//! found from the DOM's shape alone, by scoring clusters of prose-like
//! paragraphs against stop-word density and link density.
//!
//! ## Quick Start
//!
//! ```rust
//! use marrow::{Config, Extractor};
//!
//! let html = r#"<html><head><title>A Story | Example</title></head>
//! <body><div>
//!   <p>This is the first paragraph of the story and it has all of the
//!      usual words that prose tends to have in it.</p>
//!   <p>The second paragraph carries on in the same way and says a few
//!      more of the things that were going on at the time.</p>
//!   <p>And the third wraps it up with some closing thoughts about what
//!      all of this might mean for the rest of us.</p>
//! </div></body></html>"#;
//!
//! let mut config = Config::new(std::env::temp_dir());
//! config.enable_image_fetching = false;
//! let extractor = Extractor::new(config)?;
//!
//! let article = extractor.extract("http://example.com/story", Some(html), false)?;
//! assert_eq!(article.title, "A Story");
//! assert!(article.cleaned_text.contains("first paragraph"));
//! # Ok::<(), marrow::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! Each extraction runs synchronously through fixed stages: fetch (skipped
//! when HTML is supplied), document cleaning, content-node selection,
//! best-image search, output formatting, and result assembly with temp-file
//! cleanup. The algorithm is heuristic and best-effort by design; on
//! adversarial markup it can pick the wrong node.

mod cleaner;
mod config;
mod error;
mod extract;
mod formatter;
mod metadata;

/// Result types: the extracted article and its representative image.
pub mod article;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// HTML 4.0 named-entity escaping with round-trip guarantees.
pub mod entities;

/// Blocking HTTP fetch layer with manual redirect handling.
pub mod fetch;

/// Best-image search and temp-file storage.
pub mod images;

/// Static pattern tables: removal denylists, bad image names.
pub mod patterns;

/// Content-node selection and score propagation.
pub mod selector;

/// Stop-word statistics used as a prose signal.
pub mod stopwords;

/// URL helpers: resolution, crawl-URL normalization, content hashing.
pub mod url_utils;

// Public API - re-exports
pub use article::{Article, ExtractionType, Image};
pub use config::{AdditionalDataExtractor, Config, PublishDateExtractor};
pub use error::{Error, Result};
pub use fetch::HttpFetcher;

use std::fs;

/// An article extractor bound to one immutable [`Config`].
///
/// Reusable across extractions; each call runs the full pipeline and cleans
/// up its own temp files.
#[derive(Debug)]
pub struct Extractor {
    config: Config,
    fetcher: HttpFetcher,
}

impl Extractor {
    /// Creates an extractor, making sure the configured cache directory
    /// exists.
    pub fn new(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.cache_directory)?;
        Ok(Self {
            config,
            fetcher: HttpFetcher::new(),
        })
    }

    /// Extracts an article from a URL.
    ///
    /// When `html` is supplied the network fetch for the document is
    /// skipped; candidate-image fetches still go over the network unless
    /// image fetching is disabled. `for_web_view` keeps inline markup in
    /// the content subtree instead of flattening links and emphasis to
    /// text.
    ///
    /// Fetch-class failures (invalid URL, oversized or non-HTML response,
    /// network errors) are the only errors; anything that goes wrong deeper
    /// in the pipeline degrades to a partially-populated [`Article`].
    pub fn extract(&self, url: &str, html: Option<&str>, for_web_view: bool) -> Result<Article> {
        extract::perform_extraction(&self.config, &self.fetcher, url, html, for_web_view)
    }

    /// The configuration this extractor was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
