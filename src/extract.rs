//! Pipeline orchestration and result assembly.
//!
//! One extraction runs the stages strictly in order — fetch, clean, select,
//! image search, format — then deletes every temp file carrying this
//! extraction's URL hash, whatever the outcome. Only fetch-class failures
//! abort; everything downstream degrades to partially-populated fields.

use std::fs;
use std::path::Path;

use dom_query::Document;
use tracing::{debug, warn};
use url::Url;

use crate::article::Article;
use crate::cleaner;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::HttpFetcher;
use crate::formatter;
use crate::images;
use crate::metadata;
use crate::selector;
use crate::url_utils;

pub(crate) fn perform_extraction(
    config: &Config,
    fetcher: &HttpFetcher,
    url: &str,
    raw_html: Option<&str>,
    for_web_view: bool,
) -> Result<Article> {
    let crawl_url = url_utils::rewrite_hashbang(url);
    Url::parse(&crawl_url).map_err(|_| Error::InvalidUrl(crawl_url.clone()))?;

    let link_hash = url_utils::link_hash(&crawl_url);

    let result = run_pipeline(config, fetcher, &crawl_url, &link_hash, raw_html, for_web_view);

    // temp images are scoped by the URL hash; always sweep them, even when
    // the fetch failed
    release_resources(&config.cache_directory, &link_hash);

    result
}

fn run_pipeline(
    config: &Config,
    fetcher: &HttpFetcher,
    crawl_url: &str,
    link_hash: &str,
    raw_html: Option<&str>,
    for_web_view: bool,
) -> Result<Article> {
    let html = match raw_html {
        Some(html) => html.to_string(),
        None => fetcher.fetch_html(crawl_url)?,
    };

    let mut article = Article {
        raw_html: html.clone(),
        ..Article::default()
    };

    let doc = Document::from(html);

    // pluggable extractors run on the pristine document, before cleaning
    // takes away the markup they might rely on
    if let Some(extractor) = &config.publish_date_extractor {
        article.publish_date = extractor(&doc);
    }
    if let Some(extractor) = &config.additional_data_extractor {
        if let Some(data) = extractor(&doc) {
            article.additional_data = data;
        }
    }
    article.tags = metadata::extract_tags(&doc);

    cleaner::clean(&doc);

    article.title = metadata::title(&doc);
    article.meta_description = metadata::meta_description(&doc);
    article.meta_keywords = metadata::meta_keywords(&doc);
    article.canonical_link = metadata::canonical_link(&doc, crawl_url);
    article.domain = metadata::domain(&article.canonical_link);

    let Some(top) = selector::select_top_node(&doc) else {
        debug!(url = crawl_url, "no content node found");
        return Ok(article);
    };

    selector::cleanup_node(&top.selection, &top.board);

    article.movies = metadata::extract_movies(&top.selection);

    if config.enable_image_fetching {
        article.top_image = images::best_image(
            &doc,
            &top.selection,
            crawl_url,
            link_hash,
            config,
            fetcher,
        );
    }

    article.cleaned_text = if for_web_view {
        formatter::format_preserving_markup(&top.selection, &top.board, &top.spliced)
    } else {
        formatter::format(&top.selection, &top.board, &top.spliced)
    };

    Ok(article)
}

/// Deletes every cache file whose name starts with this extraction's URL
/// hash. Files from other extractions are left alone.
fn release_resources(cache_dir: &Path, link_hash: &str) {
    let Ok(entries) = fs::read_dir(cache_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(link_hash) {
            if let Err(err) = fs::remove_file(entry.path()) {
                warn!(file = name, %err, "unable to remove temp file");
            }
        }
    }
}
