//! Crawler module for index walking and page fetching
//!
//! This module contains the link discovery logic, including:
//! - HTTP fetching behind the `PageSource` capability
//! - Index page parsing and category-tag filtering
//! - Pacing between batches of collected links
//! - The crawl loop itself
//!
//! `LinkCrawler::from_config` builds a crawler from the `[crawler]` table
//! over any `PageSource`.

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{LinkCrawler, LinkSet};
pub use fetcher::{build_http_client, HttpFetcher, PageSource};
pub use parser::{has_title_tag, resolve_link, select_links, AnchorLink};
pub use scheduler::{Pacer, RateBudget, TokioPacer};

