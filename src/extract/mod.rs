//! Post content extraction
//!
//! Turns one post page into metadata and a cleaned body. Nothing here does
//! I/O; the pipeline hands in HTML and gets an `Article` back.
//!
//! - `meta`: header labels (author, board, title, time)
//! - `content`: the body block, matched against the known post templates
//! - `citation`: the optional embedded news citation block
//! - `clean`: tag, URL and entity cleanup

mod citation;
mod clean;
mod content;
mod meta;

pub use citation::extract_embedded_meta;
pub use clean::clean;
pub use content::extract_content;
pub use meta::{extract_meta, ArticleMeta, CitationMeta};

use crate::config::{CleaningConfig, CorpusConfig};
use crate::ExtractError;

/// A post reduced to its metadata and cleaned body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub meta: ArticleMeta,
    pub content: String,
}

/// Runs the extraction passes over a fetched page
#[derive(Debug, Clone)]
pub struct Extractor {
    source: String,
    article_type: String,
    cleaning: CleaningConfig,
}

impl Extractor {
    /// Creates an extractor stamping `source` and `article_type` on every article
    pub fn new(
        source: impl Into<String>,
        article_type: impl Into<String>,
        cleaning: CleaningConfig,
    ) -> Self {
        Self {
            source: source.into(),
            article_type: article_type.into(),
            cleaning,
        }
    }

    pub fn from_config(corpus: &CorpusConfig, cleaning: CleaningConfig) -> Self {
        Self::new(&corpus.source, &corpus.article_type, cleaning)
    }

    /// Extracts and cleans the article found at `url`
    ///
    /// A page whose body matches no template yields an article with empty
    /// content; only an unrecognized header aborts extraction.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::UnknownMetaLabel` for pages that are not posts.
    pub fn extract(&self, html: &str, url: &str) -> Result<Article, ExtractError> {
        let mut meta = extract_meta(html)?;
        meta.source = self.source.clone();
        meta.article_type = self.article_type.clone();
        meta.origin_url = url.to_string();

        let raw = extract_content(html).unwrap_or_else(|e| {
            tracing::warn!("{} ({}), continuing with empty content", e, url);
            String::new()
        });

        let (citation, body) = extract_embedded_meta(&raw);
        meta.citation = Some(citation);

        let content = clean(&body, &self.cleaning);

        Ok(Article { meta, content })
    }
}
