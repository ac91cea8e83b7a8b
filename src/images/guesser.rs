//! Best-image search strategies.
//!
//! Strategies run in order, first success wins:
//!
//! 1. known site-specific containers
//! 2. recursive large-image search around the content node, widening to
//!    previous siblings and then ancestors when nothing survives
//! 3. `link[rel=image_src]`, then `meta[property=og:image]`
//!
//! The large-image search is the expensive one: every surviving candidate is
//! downloaded so its true pixel dimensions can be checked, because width and
//! height attributes in the wild are absent or wrong.

use dom_query::{Document, NodeRef, Selection};
use tracing::debug;

use crate::article::{ExtractionType, Image};
use crate::config::Config;
use crate::dom;
use crate::fetch::{ContentInfo, MediaProbe};
use crate::images::store::{store_temp_image, StoredImage};
use crate::patterns::{BAD_IMAGE_NAMES, KNOWN_IMAGE_IDS};
use crate::url_utils::build_image_url;

/// How far the search widens: images under 300px wide are refused once the
/// search has climbed more than one ancestor.
const WIDE_SEARCH_MIN_WIDTH: u32 = 300;

/// Anything narrower than this is an icon.
const MIN_WIDTH: u32 = 50;

/// Candidates at or over this size are never article images.
const MAX_CANDIDATE_BYTES: u64 = 10 * 1024 * 1024;

/// At most this many candidates are probed or downloaded per node.
const MAX_CANDIDATES: usize = 30;

/// A downloaded candidate still in the running.
struct ImageCandidate {
    src: String,
    stored: StoredImage,
    score: f64,
}

/// Finds the best representative image for the selected content node.
#[must_use]
pub fn best_image(
    doc: &Document,
    top_node: &Selection,
    target_url: &str,
    link_hash: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Option<Image> {
    check_known_elements(doc, target_url, config, probe)
        .or_else(|| {
            top_node
                .nodes()
                .first()
                .and_then(|node| check_large_images(*node, 0, 0, target_url, link_hash, config, probe))
        })
        .or_else(|| check_link_tag(doc, target_url, config, probe))
        .or_else(|| check_open_graph(doc, target_url, config, probe))
}

/// Some large sites keep the story image in a well-known container; trust
/// those before searching.
fn check_known_elements(
    doc: &Document,
    target_url: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Option<Image> {
    let mut known_src: Option<String> = None;

    for name in KNOWN_IMAGE_IDS {
        let mut container = doc.select(&format!("#{name}"));
        if !container.exists() {
            container = doc.select(&format!(".{name}"));
        }
        if !container.exists() {
            continue;
        }

        let img = container.select("img");
        if let Some(src) = dom::get_attribute(&img, "src") {
            known_src = Some(src);
        }
    }

    let src = build_image_url(target_url, &known_src?);
    debug!(%src, "image found in known container");
    Some(Image {
        byte_size: candidate_bytes(probe, config.min_bytes_for_image, &src),
        src,
        extraction_type: ExtractionType::Known,
        confidence_score: 90.0,
    })
}

/// Recursive large-image search over `(node, parent_depth, sibling_depth)`.
fn check_large_images(
    node: NodeRef,
    parent_depth: u32,
    sibling_depth: u32,
    target_url: &str,
    link_hash: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Option<Image> {
    let images = Selection::from(node).select("img");
    let good_images = filter_bad_names(&images);
    let good_images = byte_size_filter(good_images, target_url, config, probe);
    let candidates = download_and_score(&good_images, parent_depth, target_url, link_hash, config, probe);

    let mut best: Option<&ImageCandidate> = None;
    for candidate in &candidates {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    if let Some(winner) = best {
        debug!(src = %winner.src, score = winner.score, "large-image search succeeded");
        return Some(Image {
            src: winner.src.clone(),
            extraction_type: ExtractionType::BigImage,
            confidence_score: 100.0 / candidates.len() as f32,
            byte_size: winner.stored.byte_size,
        });
    }

    // nothing survived here; widen to the previous sibling, then the parent
    if parent_depth < 2 {
        if let Some(prev) = prev_element_sibling(&node) {
            return check_large_images(
                prev,
                parent_depth,
                sibling_depth + 1,
                target_url,
                link_hash,
                config,
                probe,
            );
        }
        if let Some(parent) = node.parent() {
            return check_large_images(
                parent,
                parent_depth + 1,
                sibling_depth,
                target_url,
                link_hash,
                config,
                probe,
            );
        }
    }

    None
}

/// Drops (and removes from the tree) images whose filename marks them as ad
/// junk, tracking pixels or social buttons.
fn filter_bad_names<'a>(images: &Selection<'a>) -> Vec<NodeRef<'a>> {
    let mut good = Vec::new();
    for node in images.nodes() {
        let img = Selection::from(*node);
        let src = dom::get_attribute(&img, "src").unwrap_or_default();
        if src.is_empty() || BAD_IMAGE_NAMES.is_match(&src) {
            img.remove();
        } else {
            good.push(*node);
        }
    }
    good
}

/// Header-probes each candidate and keeps the plausible ones: unknown sizes
/// pass, tiny author avatars and 10 MiB monsters do not.
fn byte_size_filter<'a>(
    images: Vec<NodeRef<'a>>,
    target_url: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Vec<NodeRef<'a>> {
    let mut good = Vec::new();
    for (i, node) in images.into_iter().enumerate() {
        if i >= MAX_CANDIDATES {
            break;
        }

        let img = Selection::from(node);
        let src = dom::get_attribute(&img, "src").unwrap_or_default();
        let url = build_image_url(target_url, &src);
        let bytes = candidate_bytes(probe, config.min_bytes_for_image, &url);

        if (bytes == 0 || bytes > config.min_bytes_for_image) && bytes < MAX_CANDIDATE_BYTES {
            good.push(node);
        } else {
            img.remove();
        }
    }
    good
}

/// Downloads surviving candidates in source order and scores them.
///
/// Scoring is rank-dependent: `sequence_position⁻¹ * (area / first_area)`,
/// the first surviving candidate pinned at 1.0, so images close to the top
/// of the content need to be beaten by substantially larger ones.
fn download_and_score(
    images: &[NodeRef<'_>],
    parent_depth: u32,
    target_url: &str,
    link_hash: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Vec<ImageCandidate> {
    let mut candidates = Vec::new();
    let mut sequence_position = 1u32;
    let mut initial_area = 0u64;

    for node in images {
        if candidates.len() >= MAX_CANDIDATES {
            break;
        }

        let img = Selection::from(*node);
        let src = dom::get_attribute(&img, "src").unwrap_or_default();
        let url = build_image_url(target_url, &src);

        let Some(stored) = store_temp_image(
            probe,
            link_hash,
            &url,
            &config.cache_directory,
            config.min_bytes_for_image,
        ) else {
            continue;
        };

        // wider search radius only tolerates big images
        if parent_depth > 1 && stored.width < WIDE_SEARCH_MIN_WIDTH {
            continue;
        }

        if is_banner_dimensions(stored.width, stored.height) {
            img.remove();
            continue;
        }

        if stored.width < MIN_WIDTH {
            img.remove();
            continue;
        }

        let area = u64::from(stored.width) * u64::from(stored.height);
        let score = if initial_area == 0 {
            initial_area = area;
            1.0
        } else {
            let sequence_score = 1.0 / f64::from(sequence_position);
            sequence_score * (area as f64 / initial_area as f64)
        };

        sequence_position += 1;
        candidates.push(ImageCandidate { src: url, stored, score });
    }

    candidates
}

/// A 600x100 strip is a banner ad, not a story photo. The boundary is
/// exclusive: a 5:1 image is still acceptable.
fn is_banner_dimensions(width: u32, height: u32) -> bool {
    if width == height || width == 0 || height == 0 {
        return false;
    }

    let (larger, smaller) = if width > height { (width, height) } else { (height, width) };
    f64::from(larger) / f64::from(smaller) > 5.0
}

fn check_link_tag(
    doc: &Document,
    target_url: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Option<Image> {
    let link = doc.select("link[rel='image_src']");
    let href = dom::get_attribute(&link, "href")?;
    if href.is_empty() {
        return None;
    }

    let src = build_image_url(target_url, &href);
    Some(Image {
        byte_size: candidate_bytes(probe, config.min_bytes_for_image, &src),
        src,
        extraction_type: ExtractionType::LinkTag,
        confidence_score: 100.0,
    })
}

fn check_open_graph(
    doc: &Document,
    target_url: &str,
    config: &Config,
    probe: &dyn MediaProbe,
) -> Option<Image> {
    let meta = doc.select("meta[property='og:image']");
    let content = dom::get_attribute(&meta, "content")?;
    if content.is_empty() {
        return None;
    }

    let src = build_image_url(target_url, &content);
    Some(Image {
        byte_size: candidate_bytes(probe, config.min_bytes_for_image, &src),
        src,
        extraction_type: ExtractionType::OpenGraph,
        confidence_score: 100.0,
    })
}

/// Byte size of a candidate from a header probe. A failed probe passes the
/// size gate on purpose: the download step will find out the truth.
fn candidate_bytes(probe: &dyn MediaProbe, min_bytes: u64, url: &str) -> u64 {
    let mut bytes = min_bytes + 1;
    let ContentInfo { size, mime_type } = probe.content_info(url);
    if mime_type.contains("image") {
        bytes = size;
    }
    bytes
}

fn prev_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}
