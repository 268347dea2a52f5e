//! Configuration module for PTT-Corpus
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ptt_corpus::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Collecting at most {} links", config.crawler.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CleaningConfig, Config, CorpusConfig, CrawlerConfig, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_selector, validate_crawl_bounds};
