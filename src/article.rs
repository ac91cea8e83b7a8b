//! Result types for extraction output.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the representative image was found, in decreasing order of trust in
/// the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionType {
    /// Matched one of the known site-specific container ids/classes.
    Known,
    /// Taken from a `<meta property="og:image">` tag.
    OpenGraph,
    /// Taken from a `<link rel="image_src">` tag.
    LinkTag,
    /// Winner of the recursive large-image search around the content node.
    BigImage,
}

/// The representative image chosen for an article.
///
/// Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Absolute URL of the image.
    pub src: String,

    /// Which strategy produced this image.
    pub extraction_type: ExtractionType,

    /// Heuristic 0-100 indicator of how trustworthy the choice is. Not a
    /// calibrated probability.
    pub confidence_score: f32,

    /// Size of the image in bytes, when known.
    pub byte_size: u64,
}

/// The extraction result for one document.
///
/// Fields are populated best-effort: a failure in any single stage leaves the
/// corresponding fields at their defaults rather than aborting the whole
/// extraction.
#[derive(Debug, Default, Clone)]
pub struct Article {
    /// Page title, after delimiter splitting.
    pub title: String,

    /// Publish date, if a publish-date extractor was configured and found one.
    pub publish_date: Option<DateTime<Utc>>,

    /// Contents of `<meta name="description">`.
    pub meta_description: String,

    /// Contents of `<meta name="keywords">`.
    pub meta_keywords: String,

    /// `<link rel="canonical">` href, falling back to the crawl URL.
    pub canonical_link: String,

    /// Host of the canonical link.
    pub domain: String,

    /// The unmodified HTML the extraction ran on.
    pub raw_html: String,

    /// The cleaned article body text. Empty when no content node was found.
    pub cleaned_text: String,

    /// Best guess for the representative image, when image fetching is
    /// enabled and a candidate survived.
    pub top_image: Option<Image>,

    /// Outer HTML of youtube/vimeo embed elements found near the content.
    pub movies: Vec<String>,

    /// Tag texts collected from `a[rel=tag]`-style elements.
    pub tags: BTreeSet<String>,

    /// Output of the configured additional-data extractor.
    pub additional_data: HashMap<String, String>,
}
