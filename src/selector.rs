//! Content node selection.
//!
//! Finds the DOM subtree most likely to hold the article body by scoring
//! clusters of prose-like paragraphs and propagating those scores to parent
//! and grandparent nodes. Scores live in a side table keyed by node identity
//! rather than on the nodes themselves, so the DOM stays free of synthetic
//! attributes.

use std::collections::{HashMap, HashSet};

use dom_query::{Document, NodeId, NodeRef, Selection};
use tracing::debug;

use crate::dom;
use crate::stopwords;

/// Per-extraction score table: node identity → accumulated relevance and the
/// number of scored descendants that contributed.
///
/// Entries are written only by [`select_top_node`]; the output formatter
/// reads them afterwards.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    scores: HashMap<NodeId, i32>,
    counts: HashMap<NodeId, u32>,
}

impl ScoreBoard {
    /// Accumulated content score for a node; 0 when never scored.
    #[must_use]
    pub fn score(&self, id: NodeId) -> i32 {
        self.scores.get(&id).copied().unwrap_or(0)
    }

    /// Whether the node carries a score entry at all.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.scores.contains_key(&id)
    }

    /// Number of scored descendants that contributed to a node.
    #[must_use]
    pub fn candidate_count(&self, id: NodeId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub(crate) fn add_score(&mut self, id: NodeId, amount: i32) {
        *self.scores.entry(id).or_insert(0) += amount;
    }

    fn bump_count(&mut self, id: NodeId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }
}

/// Outcome of content selection: the chosen subtree, its score table and any
/// sibling paragraphs spliced in ahead of it.
pub struct TopNode<'a> {
    /// The selected content subtree.
    pub selection: Selection<'a>,

    /// Score annotations for the whole document, consumed by the formatter.
    pub board: ScoreBoard,

    /// Paragraph fragments pulled in from preceding siblings, in reading
    /// order. Kept out of the tree so score entries stay keyed to live nodes;
    /// the formatter emits these ahead of the subtree's own paragraphs.
    pub spliced: Vec<String>,
}

/// Scores paragraph clusters and picks the best ancestor subtree.
///
/// Returns `None` when the document has no prose-like paragraphs at all.
/// Never fails: a scoring problem on one candidate contributes nothing.
#[must_use]
pub fn select_top_node(doc: &Document) -> Option<TopNode<'_>> {
    let mut board = ScoreBoard::default();

    let candidates = doc.select("p, pre, td");
    let nodes_with_text: Vec<NodeRef> = candidates
        .nodes()
        .iter()
        .filter(|node| {
            let sel = Selection::from(**node);
            let stats = stopwords::stop_word_count(&dom::text_content(&sel));
            stats.stop_word_count > 2 && !is_high_link_density(&sel)
        })
        .copied()
        .collect();

    let number_of_nodes = nodes_with_text.len();
    debug!(candidates = number_of_nodes, "scoring prose candidates");

    // the last quarter of a long page is usually comments; push it down
    let negative_window = number_of_nodes as f64 * 0.25;
    let mut negative_total = 0.0_f64;
    let mut starting_boost = 1.0_f64;

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut parent_candidates: Vec<NodeRef> = Vec::new();

    for (i, node) in nodes_with_text.iter().enumerate() {
        let mut boost_score = 0.0_f64;

        if is_ok_to_boost(node) {
            boost_score = (1.0 / starting_boost) * 50.0;
            starting_boost += 1.0;
        }

        if number_of_nodes > 15 && (number_of_nodes - i) as f64 <= negative_window {
            let distance = negative_window - (number_of_nodes - i) as f64;
            let penalty = -distance.powi(2);
            if penalty.abs() + negative_total > 40.0 {
                boost_score = 5.0;
            } else {
                boost_score = penalty;
                negative_total += penalty.abs();
            }
        }

        let sel = Selection::from(*node);
        let stats = stopwords::stop_word_count(&dom::text_content(&sel));
        let up_score = (stats.stop_word_count as f64 + boost_score) as i32;

        let Some(parent) = node.parent() else { continue };
        board.add_score(parent.id, up_score);
        board.bump_count(parent.id);
        if seen.insert(parent.id) {
            parent_candidates.push(parent);
        }

        if let Some(grandparent) = parent.parent() {
            board.add_score(grandparent.id, up_score / 2);
            board.bump_count(grandparent.id);
            if seen.insert(grandparent.id) {
                parent_candidates.push(grandparent);
            }
        }
    }

    let mut top: Option<NodeRef> = None;
    let mut top_score = 0;
    for candidate in &parent_candidates {
        let score = board.score(candidate.id);
        if score > top_score {
            top = Some(*candidate);
            top_score = score;
        }
        // with no positive score anywhere, fall back to the first candidate
        // in document order
        if top.is_none() {
            top = Some(*candidate);
        }
    }

    let top = top?;
    debug!(score = board.score(top.id), "selected top node");

    let selection = Selection::from(top);
    let spliced = add_siblings(&selection);

    Some(TopNode { selection, board, spliced })
}

/// Checks the density of links within a node: little text, mostly inside
/// anchors, means navigation rather than prose.
///
/// Density is `(link_words / total_words) * link_count`; high only when
/// strictly greater than 1. A node without anchors is never link-dense.
#[must_use]
pub fn is_high_link_density(sel: &Selection) -> bool {
    let links = sel.select("a");
    if links.is_empty() {
        return false;
    }

    let text = dom::text_content(sel);
    let number_of_words = text.trim().split(' ').count() as f64;
    if number_of_words == 0.0 {
        return false;
    }

    let mut number_of_link_words = 0usize;
    for link in links.iter() {
        let link_text = dom::text_content(&link);
        let link_text = link_text.trim();
        if !link_text.is_empty() {
            number_of_link_words += link_text.split(' ').count();
        }
    }
    let number_of_links = links.length() as f64;

    let score = (number_of_link_words as f64 / number_of_words) * number_of_links;
    score > 1.0
}

/// A first paragraph is often an image caption, so only boost nodes that sit
/// next to other substantial paragraphs.
fn is_ok_to_boost(node: &NodeRef) -> bool {
    let mut steps_away = 0;

    let mut sibling = node.next_element_sibling();
    while let Some(s) = sibling {
        if s.node_name().is_some_and(|n| n.eq_ignore_ascii_case("p")) {
            if steps_away >= 3 {
                return false;
            }

            let stats = stopwords::stop_word_count(&dom::text_content(&Selection::from(s)));
            if stats.stop_word_count > 5 {
                return true;
            }
        }

        steps_away += 1;
        sibling = s.next_element_sibling();
    }

    false
}

/// Collects qualifying paragraphs from the top node's previous siblings, in
/// reading order, for the formatter to emit ahead of the content.
///
/// A sibling that is itself a `<p>` is taken verbatim; for container
/// siblings, each nested paragraph scoring over 30% of the content baseline
/// contributes its text as a fresh paragraph.
fn add_siblings(top: &Selection) -> Vec<String> {
    let baseline = sibling_baseline_score(top);
    let mut fragments: Vec<String> = Vec::new();

    let mut current = dom::previous_element_sibling(top);
    while let Some(sibling) = current {
        let mut block: Vec<String> = Vec::new();

        if dom::is_tag(&sibling, "p") {
            block.push(dom::outer_html(&sibling).to_string());
        } else {
            for p in sibling.select("p").iter() {
                let text = dom::text_content(&p);
                let stats = stopwords::stop_word_count(&text);
                if (baseline as f64 * 0.30) < stats.stop_word_count as f64 {
                    block.push(format!("<p>{}</p>", dom::escape_text(&text)));
                }
            }
        }

        // nearer siblings were processed first and must end up closest to
        // the content
        block.extend(fragments);
        fragments = block;

        current = dom::previous_element_sibling(&sibling);
    }

    fragments
}

/// Average stop-word count of the qualifying paragraphs inside the top node.
///
/// Long articles would dwarf any sibling if the raw total were used, so the
/// baseline is per-paragraph. Defaults high when nothing qualifies, which
/// effectively blocks sibling inclusion.
fn sibling_baseline_score(top: &Selection) -> usize {
    let mut number_of_paragraphs = 0usize;
    let mut score_of_paragraphs = 0usize;

    for p in top.select("p").iter() {
        let stats = stopwords::stop_word_count(&dom::text_content(&p));
        if stats.stop_word_count > 2 && !is_high_link_density(&p) {
            number_of_paragraphs += 1;
            score_of_paragraphs += stats.stop_word_count;
        }
    }

    if number_of_paragraphs > 0 {
        score_of_paragraphs / number_of_paragraphs
    } else {
        100_000
    }
}

/// Post-selection pruning: drops link-dense children, strips stubby
/// paragraphs, and removes children whose own score falls under 8% of the
/// top node's. `<td>` children are exempt from outright removal so table
/// articles keep their cells.
pub fn cleanup_node(top: &Selection, board: &ScoreBoard) {
    let top_score = top.nodes().first().map_or(0, |n| board.score(n.id));

    for child_node in dom::children(top).nodes() {
        let child = Selection::from(*child_node);
        if dom::is_tag(&child, "p") {
            continue;
        }

        if is_high_link_density(&child) {
            child.remove();
            continue;
        }

        for p in child.select("p").iter() {
            if dom::text_content(&p).chars().count() < 25 {
                p.remove();
            }
        }

        let is_td = dom::is_tag(&child, "td");
        if child.select("p").is_empty() && !is_td {
            child.remove();
            continue;
        }

        let threshold = f64::from(top_score) * 0.08;
        if f64::from(board.score(child_node.id)) < threshold && !is_td {
            child.remove();
        }
    }
}
