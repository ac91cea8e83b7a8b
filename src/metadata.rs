//! Document metadata extraction: title, meta tags, canonical link, tags and
//! embedded movies.

use std::collections::BTreeSet;

use dom_query::{Document, Selection};

use crate::dom;
use crate::entities;
use crate::patterns::TAG_ANCHOR_SELECTOR;
use crate::url_utils;

/// Extracts the page title, splitting off the site name when a delimiter is
/// present. Sites disagree on delimiters, so `|`, ` - `, `»` and `:` are
/// tried in that order and the longest piece wins.
#[must_use]
pub fn title(doc: &Document) -> String {
    let title_el = doc.select("title");
    if !title_el.exists() {
        return String::new();
    }

    let raw = dom::text_content(&title_el).trim().to_string();
    if raw.is_empty() {
        return String::new();
    }

    let split = if raw.contains('|') {
        best_title_piece(raw.split('|'))
    } else if raw.contains('-') {
        best_title_piece(raw.split(" - "))
    } else if raw.contains('»') {
        best_title_piece(raw.split('»'))
    } else if raw.contains(':') {
        best_title_piece(raw.split(':'))
    } else {
        raw
    };

    // strip the replacement-character artifact some CMSes leave in titles
    entities::escape_html(&split).replace("&#65533;", "")
}

/// Longest trimmed piece of a delimited title.
fn best_title_piece<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut best = "";
    for piece in pieces {
        let piece = piece.trim();
        if piece.len() > best.len() {
            best = piece;
        }
    }
    best.replace("&raquo;", "").replace('»', "").trim().to_string()
}

/// Contents of `<meta name="description">`.
#[must_use]
pub fn meta_description(doc: &Document) -> String {
    meta_content(doc, "meta[name='description']")
}

/// Contents of `<meta name="keywords">`.
#[must_use]
pub fn meta_keywords(doc: &Document) -> String {
    meta_content(doc, "meta[name='keywords']")
}

fn meta_content(doc: &Document, selector: &str) -> String {
    let meta = doc.select(selector);
    dom::get_attribute(&meta, "content")
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

/// The canonical link, falling back to the crawl URL when the page does not
/// declare one.
#[must_use]
pub fn canonical_link(doc: &Document, base_url: &str) -> String {
    let link = doc.select("link[rel='canonical']");
    match dom::get_attribute(&link, "href") {
        Some(href) if !href.trim().is_empty() => href.trim().to_string(),
        _ => base_url.to_string(),
    }
}

/// Host of the canonical link.
#[must_use]
pub fn domain(canonical: &str) -> String {
    url_utils::host_of(canonical).unwrap_or_default()
}

/// Collects tag texts from `a[rel=tag]`-style anchors. Runs on the document
/// before cleaning, since tag clusters live in chrome the cleaner removes.
#[must_use]
pub fn extract_tags(doc: &Document) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for anchor in doc.select(TAG_ANCHOR_SELECTOR).iter() {
        let text = dom::text_content(&anchor).trim().to_string();
        if !text.is_empty() {
            tags.insert(text);
        }
    }
    tags
}

/// Movie embeds we like: youtube/vimeo `embed`/`object` elements near the
/// content node. Returns their outer HTML.
#[must_use]
pub fn extract_movies(top_node: &Selection) -> Vec<String> {
    let parent = dom::parent(top_node);
    let scope = if parent.exists() { &parent } else { top_node };

    let mut movies = Vec::new();
    for candidate in scope.select("embed, object").iter() {
        let src = dom::get_attribute(&candidate, "src").unwrap_or_default();
        if src.contains("youtube") || src.contains("vimeo") {
            movies.push(dom::outer_html(&candidate).to_string());
        }
    }
    movies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_title(t: &str) -> Document {
        Document::from(format!("<html><head><title>{t}</title></head><body></body></html>"))
    }

    #[test]
    fn pipe_split_takes_longer_piece_either_side() {
        let doc = doc_with_title("Breaking News | The Daily Example");
        assert_eq!(title(&doc), "The Daily Example");

        let doc = doc_with_title("The Daily Example | Breaking News");
        assert_eq!(title(&doc), "The Daily Example");

        let doc = doc_with_title("A Much Longer Headline About Events | Site");
        assert_eq!(title(&doc), "A Much Longer Headline About Events");
    }

    #[test]
    fn dash_and_colon_splits() {
        let doc = doc_with_title("A Fairly Long Story Headline - Example");
        assert_eq!(title(&doc), "A Fairly Long Story Headline");

        let doc = doc_with_title("Site: A Fairly Long Story Headline");
        assert_eq!(title(&doc), "A Fairly Long Story Headline");
    }

    #[test]
    fn undelimited_title_is_kept_whole() {
        let doc = doc_with_title("Just a Headline");
        assert_eq!(title(&doc), "Just a Headline");
    }

    #[test]
    fn missing_or_empty_title_yields_empty() {
        let doc = Document::from("<html><head></head><body></body></html>");
        assert_eq!(title(&doc), "");

        let doc = doc_with_title("   ");
        assert_eq!(title(&doc), "");
    }

    #[test]
    fn meta_description_and_keywords() {
        let doc = Document::from(
            r#"<html><head>
                <meta name="description" content=" A summary. ">
                <meta name="keywords" content="one,two">
            </head><body></body></html>"#,
        );
        assert_eq!(meta_description(&doc), "A summary.");
        assert_eq!(meta_keywords(&doc), "one,two");
    }

    #[test]
    fn canonical_falls_back_to_crawl_url() {
        let doc = Document::from(
            r#"<html><head><link rel="canonical" href="http://example.com/canonical"></head><body></body></html>"#,
        );
        assert_eq!(canonical_link(&doc, "http://example.com/x"), "http://example.com/canonical");

        let doc = Document::from("<html><head></head><body></body></html>");
        assert_eq!(canonical_link(&doc, "http://example.com/x"), "http://example.com/x");
    }

    #[test]
    fn domain_is_host_of_canonical() {
        assert_eq!(domain("http://news.example.com/a"), "news.example.com");
        assert_eq!(domain("garbage"), "");
    }

    #[test]
    fn rel_tag_anchors_are_collected() {
        let doc = Document::from(
            r#"<html><body>
                <a rel="tag" href="/t/politics">politics</a>
                <a href="http://example.com/tag/economy">economy</a>
                <a href="/other">not a tag</a>
                <a rel="tag" href="/t/empty"></a>
            </body></html>"#,
        );
        let tags = extract_tags(&doc);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("politics"));
        assert!(tags.contains("economy"));
    }

    #[test]
    fn youtube_and_vimeo_embeds_are_extracted() {
        let doc = Document::from(
            r#"<html><body><div>
                <div id="story"><p>text</p></div>
                <embed src="http://www.youtube.com/v/abc123">
                <object src="http://vimeo.com/moogaloop.swf"></object>
                <embed src="http://ads.example.com/flash.swf">
            </div></body></html>"#,
        );
        let movies = extract_movies(&doc.select("#story"));
        assert_eq!(movies.len(), 2);
        assert!(movies[0].contains("youtube"));
        assert!(movies[1].contains("vimeo"));
    }
}
