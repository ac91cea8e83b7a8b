//! Output formatting.
//!
//! Takes the selected content subtree, prunes what the scorer marked as
//! noise, and serializes the surviving paragraphs. Two modes share the
//! pruning pass: plain mode flattens links and inline emphasis to text and
//! drops low-signal elements; the markup-preserving mode only drops empty
//! ones.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::entities;
use crate::selector::ScoreBoard;
use crate::stopwords;

/// Formats the content subtree as plain text: paragraphs in document order,
/// each followed by a blank line.
#[must_use]
pub fn format(top: &Selection, board: &ScoreBoard, spliced: &[String]) -> String {
    prune_scored(top, board);

    let mut out = String::new();
    with_fragments(spliced, |root| {
        plain_transform(root);
        collect_paragraphs(root, &mut out);
    });

    plain_transform(top);
    collect_paragraphs(top, &mut out);
    out
}

/// Formats the content subtree keeping inline markup in place; only
/// empty-text elements are dropped after pruning.
#[must_use]
pub fn format_preserving_markup(top: &Selection, board: &ScoreBoard, spliced: &[String]) -> String {
    prune_scored(top, board);

    let mut out = String::new();
    with_fragments(spliced, |root| {
        markup_transform(root);
        collect_paragraphs(root, &mut out);
    });

    markup_transform(top);
    collect_paragraphs(top, &mut out);
    out
}

/// Runs `f` over a throwaway document holding the spliced sibling
/// paragraphs, so they pass through the same transforms as the tree proper.
fn with_fragments(spliced: &[String], f: impl FnOnce(&Selection)) {
    if spliced.is_empty() {
        return;
    }
    let doc = Document::from(spliced.concat());
    let body = doc.select("body");
    f(&body);
}

/// Shared pruning: descendants the scorer marked below 1 are noise.
fn prune_scored(top: &Selection, board: &ScoreBoard) {
    for node in descendant_nodes(top) {
        if node.is_element() && board.contains(node.id) && board.score(node.id) < 1 {
            Selection::from(node).remove();
        }
    }
}

fn plain_transform(root: &Selection) {
    // anchors become their text unless they carry an image
    for node in root.select("a").nodes().to_vec() {
        let link = Selection::from(node);
        if link.select("img").is_empty() {
            dom::replace_with_text(&link);
        }
    }

    for tag in ["strong", "b", "i"] {
        for node in root.select(tag).nodes().to_vec() {
            dom::replace_with_text(&Selection::from(node));
        }
    }

    // after flattening, anything left with almost no prose is noise, unless
    // it wraps an embedded media object
    for node in descendant_nodes(root) {
        if !node.is_element() {
            continue;
        }
        let el = Selection::from(node);
        let stats = stopwords::stop_word_count(&dom::text_content(&el));
        if stats.stop_word_count < 5 && !holds_media(&el) {
            el.remove();
        }
    }
}

fn markup_transform(root: &Selection) {
    for node in descendant_nodes(root) {
        if !node.is_element() {
            continue;
        }
        let el = Selection::from(node);
        if dom::text_content(&el).trim().is_empty() && !holds_media(&el) {
            el.remove();
        }
    }
}

/// Whether an element is, or wraps, an embedded media object.
fn holds_media(el: &Selection) -> bool {
    dom::is_tag(el, "object")
        || dom::is_tag(el, "embed")
        || !el.select("object").is_empty()
        || !el.select("embed").is_empty()
}

fn collect_paragraphs(root: &Selection, out: &mut String) {
    for p in root.select("p").iter() {
        let text = entities::unescape_html(&dom::text_content(&p));
        out.push_str(text.trim());
        out.push_str("\n\n");
    }
}

fn descendant_nodes<'a>(root: &Selection<'a>) -> Vec<NodeRef<'a>> {
    match root.nodes().first() {
        Some(node) => node.descendants().into_iter().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str =
        "This was a story about the ways in which all of us have been doing things for years.";

    fn board() -> ScoreBoard {
        ScoreBoard::default()
    }

    #[test]
    fn paragraphs_are_joined_with_blank_lines() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE}</p><p>{PROSE}</p></div></body></html>"
        ));
        let out = format(&doc.select("#top"), &board(), &[]);

        assert_eq!(out.matches(PROSE).count(), 2);
        assert!(out.contains("\n\n"));
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn plain_mode_flattens_links_to_text() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE} See <a href=\"/more\">all of the other things we did</a> today.</p></div></body></html>"
        ));
        let out = format(&doc.select("#top"), &board(), &[]);

        assert!(out.contains("all of the other things we did"));
        assert!(!out.contains("href"));
    }

    #[test]
    fn plain_mode_drops_low_signal_paragraphs() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE}</p><p>Photo: Reuters</p></div></body></html>"
        ));
        let out = format(&doc.select("#top"), &board(), &[]);

        assert!(out.contains("story about the ways"));
        assert!(!out.contains("Photo: Reuters"));
    }

    #[test]
    fn markup_mode_keeps_short_but_nonempty_paragraphs() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE}</p><p>Photo: Reuters</p><p>  </p></div></body></html>"
        ));
        let out = format_preserving_markup(&doc.select("#top"), &board(), &[]);

        assert!(out.contains("Photo: Reuters"));
    }

    #[test]
    fn negatively_scored_descendants_are_pruned() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE}</p><div id=\"trail\"><p>{PROSE} extra words</p></div></div></body></html>"
        ));
        let top = doc.select("#top");

        let mut board = ScoreBoard::default();
        if let Some(node) = doc.select("#trail").nodes().first() {
            board.add_score(node.id, -12);
        }

        let out = format(&top, &board, &[]);
        assert!(out.contains(PROSE));
        assert!(!out.contains("extra words"));
    }

    #[test]
    fn spliced_fragments_come_first_and_share_the_rules() {
        let doc = Document::from(format!(
            "<html><body><div id=\"top\"><p>{PROSE}</p></div></body></html>"
        ));
        let spliced = vec![
            format!("<p>Lead in: {PROSE}</p>"),
            "<p>tiny</p>".to_string(),
        ];
        let out = format(&doc.select("#top"), &board(), &spliced);

        let lead_pos = out.find("Lead in:");
        let body_pos = out.find("This was a story");
        assert!(lead_pos.is_some());
        assert!(!out.contains("tiny"));
        assert!(lead_pos < body_pos);
    }

    #[test]
    fn embedded_media_wrappers_survive_plain_mode() {
        let doc = Document::from(
            "<html><body><div id=\"top\"><div id=\"player\"><object data=\"movie.swf\"></object></div></div></body></html>",
        );
        format(&doc.select("#top"), &board(), &[]);

        assert!(doc.select("#player").exists());
    }
}
