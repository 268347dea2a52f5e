//! Link crawler - index walking and link collection
//!
//! This module contains the crawl loop that walks a board's index pages from
//! a starting page number down towards page 1, collecting links to posts
//! whose titles carry the configured category tag.

use crate::config::{parse_selector, validate_crawl_bounds, Config};
use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::{has_title_tag, resolve_link, select_links};
use crate::crawler::scheduler::{Pacer, RateBudget, TokioPacer};
use crate::{ConfigError, CorpusError, CrawlError};
use scraper::Selector;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Deduplicated set of collected post URLs
///
/// Iteration order is the URLs' sort order, not discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: BTreeSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link, returning false if it was already present
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }
}

impl IntoIterator for LinkSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

/// Walks a board's index pages and collects tagged post links
pub struct LinkCrawler {
    source: Arc<dyn PageSource>,
    pacer: Arc<dyn Pacer>,
    index_url: String,
    title_tag: String,
    selector: Selector,
    stop: Arc<AtomicBool>,
}

impl LinkCrawler {
    /// Creates a crawler over `source`
    ///
    /// # Arguments
    ///
    /// * `source` - Fetches index pages
    /// * `index_url` - Index URL with a `{}` placeholder for the page number
    /// * `title_tag` - Required prefix of accepted anchor texts
    /// * `link_selector` - CSS selector for post anchors
    pub fn new(
        source: Arc<dyn PageSource>,
        index_url: impl Into<String>,
        title_tag: impl Into<String>,
        link_selector: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            pacer: Arc::new(TokioPacer),
            index_url: index_url.into(),
            title_tag: title_tag.into(),
            selector: parse_selector(link_selector)?,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Creates a crawler over `source` using the `[crawler]` table
    pub fn from_config(config: &Config, source: Arc<dyn PageSource>) -> Result<Self, ConfigError> {
        Self::new(
            source,
            &config.crawler.index_url,
            &config.crawler.title_tag,
            &config.crawler.link_selector,
        )
    }

    /// Replaces the pacer (tests use one that records instead of sleeping)
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Shares a stop flag; once set, the crawl ends before the next page
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// URL of index page `page`
    pub fn index_page_url(&self, page: u32) -> Result<Url, CrawlError> {
        let url = self.index_url.replace("{}", &page.to_string());
        Url::parse(&url).map_err(|e| CrawlError::IndexUrl {
            page,
            message: e.to_string(),
        })
    }

    /// Collects tagged post links
    ///
    /// Pages are visited from `start_page` down to 1. A page that fails to
    /// load is logged and contributes no links. The crawl ends once
    /// `max_links` distinct links are collected or the pages run out; after
    /// every `rate_interval` collected links it pauses for `pause_seconds`.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigError` for invalid bounds, before any request.
    pub async fn crawl(
        &self,
        start_page: u32,
        max_links: usize,
        rate_interval: usize,
        pause_seconds: f64,
    ) -> Result<LinkSet, CorpusError> {
        let pause = validate_crawl_bounds(start_page, max_links, rate_interval, pause_seconds)?;

        let budget = RateBudget::new(rate_interval, pause);
        let mut links = LinkSet::new();

        tracing::info!(
            "Crawling index pages {}..1 for '{}' (max {} links)",
            start_page,
            self.title_tag,
            max_links
        );

        for page in (1..=start_page).rev() {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, ending crawl at page {}", page);
                break;
            }

            let page_url = self.index_page_url(page)?;
            let html = match self.source.fetch(page_url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Skipping index page {}: {}", page, e);
                    continue;
                }
            };

            let mut accepted = 0;
            for anchor in select_links(&html, &self.selector) {
                if !has_title_tag(&anchor.text, &self.title_tag) {
                    continue;
                }

                let link = match resolve_link(&anchor.href, &page_url) {
                    Some(link) => link,
                    None => continue,
                };

                if !links.insert(link) {
                    continue;
                }
                accepted += 1;

                if let Some(pause) = budget.record() {
                    tracing::debug!(
                        "Collected {} links, pausing for {:?}",
                        links.len(),
                        pause
                    );
                    self.pacer.pause(pause).await;
                }

                if links.len() >= max_links {
                    tracing::info!("Reached {} links at index page {}", links.len(), page);
                    return Ok(links);
                }
            }

            tracing::debug!(
                "Index page {}: {} new links, {} total",
                page,
                accepted,
                links.len()
            );
        }

        tracing::info!("Crawl finished with {} links", links.len());
        Ok(links)
    }
}
