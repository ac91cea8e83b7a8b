//! Compiled regex patterns used across the extraction pipeline.
//!
//! All patterns are compiled once at startup using `LazyLock`. These tables
//! are static configuration data, not tunables; the removal denylist in
//! particular is a curated set of tokens seen on comment sections, footers,
//! social widgets, bylines and similar boilerplate.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Document cleaning patterns
// =============================================================================

/// Matches id/class/name values of elements that are almost never article
/// content: comment blocks, footers, social widgets, bylines, pagination
/// tools and friends.
pub static REMOVE_NODES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "^side$|combx|retweet|menucontainer|navbar|comment|PopularQuestions|contact\
         |foot|footer|Footer|footnote|cnn_strycaptiontxt|links|meta$|scroll|shoutbox\
         |sponsor|tags|socialnetworking|socialNetworking|cnnStryHghLght|cnn_stryspcvbx\
         |^inset$|pagetools|post-attributes|welcome_form|contentTools2|the_answers\
         |communitypromo|subscribe|vcard|articleheadings|date|print|popup\
         |author-dropdown|tools|socialtools|byline|konafilter|KonaFilter|breadcrumbs\
         |^fn$|wp-caption-text",
    )
    .expect("REMOVE_NODES regex")
});

/// Exact "caption" id/class.
pub static CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^caption$").expect("CAPTION regex"));

/// The literal " google " token inside an id/class value.
pub static GOOGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(" google ").expect("GOOGLE regex"));

/// "more" id/class values that are not `entry-` prefixed (read-more widgets,
/// not WordPress entry bodies).
pub static MORE_NOT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[^entry-]more.*$").expect("MORE_NOT_ENTRY regex"));

/// "facebook" not preceded by a hyphen.
pub static FACEBOOK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^-]facebook").expect("FACEBOOK regex"));

/// "twitter" not preceded by a hyphen.
pub static TWITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^-]twitter").expect("TWITTER regex"));

/// Drop-cap span classes; these wrap the first letter of a paragraph for
/// styling and break text flow if left in place.
pub static DROP_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("dropcap|drop_cap").expect("DROP_CAP regex"));

/// Detects block-level tags inside a div/span's inner HTML. A container with
/// none of these is a styling wrapper around text and can become a `<p>`.
pub static BLOCK_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("<(a|blockquote|dl|div|img|ol|p|pre|table|ul)").expect("BLOCK_TAGS regex")
});

// =============================================================================
// Image filtering patterns
// =============================================================================

/// Known-bad image filenames: ad networks, tracking pixels, social buttons
/// and other decorative junk that is never the article image.
pub static BAD_IMAGE_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "\\.html|\\.gif|\\.ico|button|twitter\\.jpg|facebook\\.jpg|digg\\.jpg\
         |digg\\.png|delicious\\.png|facebook\\.png|reddit\\.jpg|doubleclick\
         |diggthis|diggThis|adserver|/ads/|ec\\.atdmt\\.com|mediaplex\\.com\
         |adsatt|view\\.atdmt",
    )
    .expect("BAD_IMAGE_NAMES regex")
});

// =============================================================================
// CSS selectors
// =============================================================================

/// Selector for tag anchors (`<a rel="tag">` and `/tag/` hrefs).
pub const TAG_ANCHOR_SELECTOR: &str = "a[rel='tag'], a[href*='/tag/']";

/// Known site-specific containers that hold the article image.
pub const KNOWN_IMAGE_IDS: &[&str] =
    &["yn-story-related-media", "cnn_strylccimg300cntr", "big_photo"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_nodes_matches_boilerplate_tokens() {
        assert!(REMOVE_NODES.is_match("comment"));
        assert!(REMOVE_NODES.is_match("user-comments"));
        assert!(REMOVE_NODES.is_match("footer"));
        assert!(REMOVE_NODES.is_match("social-tools"));
        assert!(REMOVE_NODES.is_match("breadcrumbs"));
        assert!(!REMOVE_NODES.is_match("article-body"));
        assert!(!REMOVE_NODES.is_match("story"));
    }

    #[test]
    fn remove_nodes_anchored_tokens_do_not_overmatch() {
        assert!(REMOVE_NODES.is_match("side"));
        assert!(!REMOVE_NODES.is_match("sidebar-story"));
        assert!(REMOVE_NODES.is_match("fn"));
        assert!(!REMOVE_NODES.is_match("fnord"));
    }

    #[test]
    fn caption_is_exact() {
        assert!(CAPTION.is_match("caption"));
        assert!(!CAPTION.is_match("wp-caption"));
        assert!(!CAPTION.is_match("captions"));
    }

    #[test]
    fn social_tokens_require_leading_character() {
        assert!(FACEBOOK.is_match("myfacebook"));
        assert!(!FACEBOOK.is_match("-facebook"));
        assert!(!FACEBOOK.is_match("facebook"));

        assert!(TWITTER.is_match("sometwitter"));
        assert!(!TWITTER.is_match("share-twitter"));
    }

    #[test]
    fn more_requires_non_entry_prefix() {
        assert!(MORE_NOT_ENTRY.is_match("xmore-links"));
        assert!(!MORE_NOT_ENTRY.is_match("more"));
        assert!(!MORE_NOT_ENTRY.is_match("entry-more"));
    }

    #[test]
    fn block_tags_detects_nested_blocks() {
        assert!(BLOCK_TAGS.is_match("<p>text</p>"));
        assert!(BLOCK_TAGS.is_match("before <img src=\"x\"> after"));
        assert!(!BLOCK_TAGS.is_match("just <b>inline</b> text"));
    }

    #[test]
    fn bad_image_names_flags_ads_and_buttons() {
        assert!(BAD_IMAGE_NAMES.is_match("http://ads.example.com/banner.gif"));
        assert!(BAD_IMAGE_NAMES.is_match("http://cdn.example.com/facebook.png"));
        assert!(BAD_IMAGE_NAMES.is_match("http://x.com/img/button-small.png"));
        assert!(BAD_IMAGE_NAMES.is_match("http://x.doubleclick.net/pixel.png"));
        assert!(!BAD_IMAGE_NAMES.is_match("http://cdn.example.com/photos/story.jpg"));
    }
}
