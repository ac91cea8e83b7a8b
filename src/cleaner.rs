//! Document cleaner.
//!
//! First phase of the pipeline: strips structural noise (scripts, known
//! boilerplate containers, social widgets) and normalizes markup so that
//! text-bearing divs and spans become paragraphs the selector can score.
//! The pass is total: a failure on one node skips that node only.
//!
//! Step order matters — markup is normalized (em/drop-cap unwrapping) before
//! denylist removal, and div flattening runs last so it sees the cleaned
//! tree.

use dom_query::{Document, Selection};
use tracing::debug;

use crate::dom;
use crate::patterns::{
    BLOCK_TAGS, CAPTION, DROP_CAP, FACEBOOK, GOOGLE, MORE_NOT_ENTRY, REMOVE_NODES, TWITTER,
};

/// Cleans a parsed document in place.
pub fn clean(doc: &Document) {
    unwrap_em_tags(doc);
    unwrap_drop_caps(doc);
    remove_scripts_and_styles(doc);
    remove_denylisted_nodes(doc);

    remove_nodes_matching(doc, &CAPTION);
    remove_nodes_matching(doc, &GOOGLE);
    remove_nodes_matching(doc, &MORE_NOT_ENTRY);
    // social embeds hide behind inconsistent class spellings
    remove_nodes_matching(doc, &FACEBOOK);
    remove_nodes_matching(doc, &TWITTER);

    convert_to_paragraphs(doc, "div");
    convert_to_paragraphs(doc, "span");
}

/// Unwraps `<em>` elements into plain text unless they carry an image.
fn unwrap_em_tags(doc: &Document) {
    for node in doc.select("em").nodes() {
        let em = Selection::from(*node);
        if em.select("img").is_empty() {
            dom::replace_with_text(&em);
        }
    }
}

/// Unwraps drop-cap spans so the first letter rejoins its paragraph text.
fn unwrap_drop_caps(doc: &Document) {
    for node in doc.select("span").nodes() {
        let span = Selection::from(*node);
        let class = dom::get_attribute(&span, "class").unwrap_or_default();
        if DROP_CAP.is_match(&class) {
            dom::replace_with_text(&span);
        }
    }
}

fn remove_scripts_and_styles(doc: &Document) {
    doc.select("script").remove();
    doc.select("style").remove();
}

/// Removes elements under `<body>` whose id, class or name matches the
/// removal denylist. Only body descendants are inspected so the body itself
/// can never be removed.
fn remove_denylisted_nodes(doc: &Document) {
    for node in doc.select("body *").nodes() {
        let el = Selection::from(*node);
        let matches = [
            dom::get_attribute(&el, "id"),
            dom::get_attribute(&el, "class"),
            dom::get_attribute(&el, "name"),
        ]
        .into_iter()
        .flatten()
        .any(|value| REMOVE_NODES.is_match(&value));

        if matches {
            el.remove();
        }
    }
}

/// Removes elements whose id or class matches one standalone pattern.
fn remove_nodes_matching(doc: &Document, pattern: &regex::Regex) {
    for node in doc.select("[id], [class]").nodes() {
        let el = Selection::from(*node);
        let hit = dom::get_attribute(&el, "id")
            .is_some_and(|v| pattern.is_match(&v))
            || dom::get_attribute(&el, "class").is_some_and(|v| pattern.is_match(&v));
        if hit {
            el.remove();
        }
    }
}

/// Turns text-bearing containers into paragraphs.
///
/// A container with no nested block-level markup is replaced with a `<p>`
/// holding the same inner HTML. A container that does hold block children
/// gets its loose text-node children (plus an immediately preceding `<a>`
/// sibling's markup, to keep link text attached) merged into one synthetic
/// `<p>` placed before the remaining children; the consumed text nodes are
/// dropped and block-level children stay untouched.
///
/// Processed in reverse document order so descendants are rewritten before
/// any ancestor re-serializes them.
fn convert_to_paragraphs(doc: &Document, tag: &str) {
    let nodes: Vec<_> = doc.select(tag).nodes().to_vec();

    for node in nodes.iter().rev() {
        let container = Selection::from(*node);
        if dom::tag_name(&container).is_none() {
            // already detached by an earlier rewrite
            continue;
        }

        let inner = dom::inner_html(&container).to_lowercase();
        if BLOCK_TAGS.is_match(&inner) {
            merge_loose_text(&container, node);
        } else {
            let inner = dom::inner_html(&container);
            dom::replace_with_html(&container, &format!("<p>{inner}</p>"));
        }
    }
}

/// Merges a container's direct text nodes into one leading paragraph.
fn merge_loose_text(container: &Selection, node: &dom_query::NodeRef) {
    let mut merged = String::new();
    let mut consumed = Vec::new();

    for child in node.children() {
        if !child.is_text() {
            continue;
        }
        let text = child.text().replace('\t', "");
        if text.trim().len() <= 1 {
            continue;
        }

        // keep a preceding link attached to its trailing text
        if let Some(prev) = child.prev_sibling() {
            if prev.is_element() && prev.node_name().is_some_and(|n| n.eq_ignore_ascii_case("a")) {
                merged.push_str(&dom::outer_html(&Selection::from(prev)));
            }
        }
        merged.push_str(&dom::escape_text(&text));
        consumed.push(child.id);
    }

    if merged.is_empty() {
        return;
    }

    let mut rebuilt = String::new();
    rebuilt.push_str("<p>");
    rebuilt.push_str(&merged);
    rebuilt.push_str("</p>");

    for child in node.children() {
        if consumed.contains(&child.id) {
            continue;
        }
        if child.is_element() {
            rebuilt.push_str(&dom::outer_html(&Selection::from(child)));
        } else if child.is_text() {
            rebuilt.push_str(&dom::escape_text(&child.text()));
        }
    }

    debug!(tag = ?dom::tag_name(container), "merged loose text into synthetic paragraph");
    dom::set_inner_html(container, &rebuilt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn em_without_image_is_unwrapped() {
        let doc = Document::from("<html><body><p>text <em>emphasis</em> more</p></body></html>");
        clean(&doc);

        assert!(doc.select("em").is_empty());
        assert_eq!(dom::text_content(&doc.select("p")), "text emphasis more".into());
    }

    #[test]
    fn em_with_image_survives() {
        let doc = Document::from(
            r#"<html><body><p><em><img src="http://x.com/pic.jpg"></em></p></body></html>"#,
        );
        clean(&doc);

        assert!(doc.select("em").exists());
        assert!(doc.select("img").exists());
    }

    #[test]
    fn drop_cap_spans_are_unwrapped() {
        let doc = Document::from(
            r#"<html><body><p><span class="dropcap">T</span>he story begins</p></body></html>"#,
        );
        clean(&doc);

        assert!(doc.select("span.dropcap").is_empty());
        assert_eq!(dom::text_content(&doc.select("p")), "The story begins".into());
    }

    #[test]
    fn scripts_and_styles_are_removed() {
        let doc = Document::from(
            "<html><head><style>p{}</style></head><body><script>var x;</script><p>text</p></body></html>",
        );
        clean(&doc);

        assert!(doc.select("script").is_empty());
        assert!(doc.select("style").is_empty());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn denylisted_containers_are_removed() {
        let doc = Document::from(
            r#"<html><body>
                <div id="article"><p>keep this</p></div>
                <div id="comments"><p>spam</p></div>
                <div class="site-footer-links">junk</div>
                <div name="socialnetworking">buttons</div>
            </body></html>"#,
        );
        clean(&doc);

        let body_text = dom::text_content(&doc.select("body")).to_string();
        assert!(body_text.contains("keep this"));
        assert!(!body_text.contains("spam"));
        assert!(!body_text.contains("junk"));
        assert!(!body_text.contains("buttons"));
    }

    #[test]
    fn caption_pattern_is_exact() {
        let doc = Document::from(
            r#"<html><body>
                <div class="caption">gone</div>
                <div class="photo-caption-wrap">kept</div>
            </body></html>"#,
        );
        clean(&doc);

        let body_text = dom::text_content(&doc.select("body")).to_string();
        assert!(!body_text.contains("gone"));
        assert!(body_text.contains("kept"));
    }

    #[test]
    fn hyphenated_social_classes_survive() {
        let doc = Document::from(
            r#"<html><body>
                <div class="mytwitterwidget">removed</div>
                <div class="share-twitter">stays</div>
            </body></html>"#,
        );
        clean(&doc);

        let body_text = dom::text_content(&doc.select("body")).to_string();
        assert!(!body_text.contains("removed"));
        assert!(body_text.contains("stays"));
    }

    #[test]
    fn textual_div_becomes_paragraph() {
        let doc = Document::from(
            "<html><body><div>This is some text in a div with <b>inline</b> markup only.</div></body></html>",
        );
        clean(&doc);

        assert!(doc.select("body > div").is_empty());
        let p_text = dom::text_content(&doc.select("p")).to_string();
        assert!(p_text.contains("This is some text in a div"));
    }

    #[test]
    fn layout_div_gets_synthetic_leading_paragraph() {
        let doc = Document::from(
            "<html><body><div id=\"wrap\">loose leading text<p>real paragraph here</p></div></body></html>",
        );
        clean(&doc);

        let wrap = doc.select("#wrap");
        assert!(wrap.exists());
        // loose text was pulled into its own paragraph ahead of the block child
        let paragraphs = wrap.select("p");
        assert_eq!(paragraphs.length(), 2);
        let first = dom::text_content(&paragraphs).to_string();
        assert!(first.contains("loose leading text"));
        assert!(first.contains("real paragraph here"));
    }

    #[test]
    fn preceding_link_markup_is_kept_with_merged_text() {
        let doc = Document::from(
            r#"<html><body><div id="wrap"><a href="/x">Linked</a> trailing words of text<p>block paragraph stays</p></div></body></html>"#,
        );
        clean(&doc);

        let wrap = doc.select("#wrap");
        let first_p = wrap.select("p");
        let html = dom::outer_html(&first_p).to_string();
        assert!(html.contains("Linked"));
        assert!(html.contains("trailing words of text"));
    }

    #[test]
    fn cleaning_is_idempotent_on_empty_documents() {
        let doc = Document::from("<html><body></body></html>");
        clean(&doc);
        assert!(doc.select("body").exists());
    }
}
