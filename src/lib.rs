//! PTT-Corpus: a news-repost harvester for a PTT board
//!
//! This crate walks a board's paginated index for news reposts, extracts the
//! article metadata and body from each post, and serializes the cleaned text
//! into a VRT-style annotated corpus alongside per-article frequency summaries.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pipeline;

use thiserror::Error;

/// Main error type for PTT-Corpus operations
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are always fatal and are raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Session-level crawler failures
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Failed to initialize HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid index URL for page {page}: {message}")]
    IndexUrl { page: u32, message: String },
}

/// Transport or HTTP status failure for a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// The page did not match any known post template
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unknown metadata label: {0}")]
    UnknownMetaLabel(String),

    #[error("No content block matched any known template")]
    ContentNotFound,
}

/// Segmentation or serialization failure for one article
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid sentence delimiter pattern: {0}")]
    Delimiter(#[from] regex::Error),

    #[error("Segmenter failed: {0}")]
    Segmenter(String),

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PTT-Corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use corpus::{Document, Encoder, Summary, Token};
pub use crawler::{LinkCrawler, LinkSet};
pub use extract::{Article, ArticleMeta, Extractor};
