//! URL utilities: validation, resolution, crawl-URL normalization and the
//! content hash used to scope temp files to one extraction.

use sha2::{Digest, Sha256};
use url::Url;

/// Check if a string is a valid absolute URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form against a base.
///
/// Returns the original string if resolution fails.
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    if url_str.starts_with("data:") || url_str.starts_with("javascript:") {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Builds the absolute URL of an image reference found on a page.
///
/// Bare spaces in the source are repaired to `%20` when the base cannot be
/// parsed; otherwise `Url::join` percent-encodes as needed.
#[must_use]
pub fn build_image_url(page_url: &str, image_src: &str) -> String {
    match Url::parse(page_url) {
        Ok(base) => create_absolute_url(image_src, &base),
        Err(_) => image_src.replace(' ', "%20"),
    }
}

/// Rewrites the legacy AJAX `#!` fragment marker so crawlable snapshots are
/// requested instead of the empty shell page.
#[must_use]
pub fn rewrite_hashbang(url: &str) -> String {
    if url.contains("#!") {
        url.replacen("#!", "?_escaped_fragment_=", 1)
    } else {
        url.to_string()
    }
}

/// Lowercase hex content hash of a URL, used as the temp-file name prefix
/// that scopes cache cleanup to one extraction.
#[must_use]
pub fn link_hash(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// Host of a URL, when it has one.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_detection() {
        assert!(is_absolute_url("http://example.com/a").0);
        assert!(is_absolute_url("https://example.com").0);
        assert!(!is_absolute_url("/relative/path").0);
        assert!(!is_absolute_url("ftp://example.com").0);
        assert!(!is_absolute_url("").0);
    }

    #[test]
    fn relative_image_urls_resolve_against_the_page() {
        let src = build_image_url("http://example.com/news/story.html", "../img/photo.jpg");
        assert_eq!(src, "http://example.com/img/photo.jpg");

        let absolute = build_image_url("http://example.com/a", "http://cdn.example.com/x.jpg");
        assert_eq!(absolute, "http://cdn.example.com/x.jpg");
    }

    #[test]
    fn image_urls_with_spaces_are_encoded() {
        let src = build_image_url("http://example.com/a/", "my photo.jpg");
        assert_eq!(src, "http://example.com/a/my%20photo.jpg");
    }

    #[test]
    fn hashbang_becomes_escaped_fragment() {
        assert_eq!(
            rewrite_hashbang("http://gawker.example.com/#!5912133/story"),
            "http://gawker.example.com/?_escaped_fragment_=5912133/story"
        );
        assert_eq!(rewrite_hashbang("http://example.com/a"), "http://example.com/a");
    }

    #[test]
    fn link_hash_is_stable_lowercase_hex() {
        let first = link_hash("http://example.com/a");
        let second = link_hash("http://example.com/a");
        let other = link_hash("http://example.com/b");

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn host_extraction() {
        assert_eq!(host_of("http://news.example.com/a/b"), Some("news.example.com".to_string()));
        assert_eq!(host_of("not a url"), None);
    }
}
