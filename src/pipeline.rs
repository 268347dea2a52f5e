//! Run driver
//!
//! Connects the link crawler to the article stage: every link is fetched,
//! extracted, checked against the lexicon, encoded and written. A failing
//! article is logged with its URL and skipped; the run goes on.

use crate::config::Config;
use crate::corpus::{Encoder, Lexicon, Segmenter};
use crate::crawler::{LinkCrawler, PageSource};
use crate::extract::Extractor;
use crate::output::{read_link_list, CorpusWriter, LinkLedger, RunStatistics, WrittenArticle};
use crate::CorpusError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Crawl the index, then process every unprocessed link
    Full,

    /// Crawl the index and only record the links found
    LinksOnly,

    /// Process unprocessed links from the saved link list without crawling
    NoCrawl,
}

/// Result of processing one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Written(WrittenArticle),

    /// The article contains none of the lexicon terms
    NoLexiconMatch,
}

/// The article stage of a run
pub struct Pipeline {
    source: Arc<dyn PageSource>,
    extractor: Extractor,
    encoder: Encoder,
    writer: CorpusWriter,
    processed: LinkLedger,
    lexicon: Option<Lexicon>,
    stop: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: Extractor,
        encoder: Encoder,
        writer: CorpusWriter,
        processed: LinkLedger,
    ) -> Self {
        Self {
            source,
            extractor,
            encoder,
            writer,
            processed,
            lexicon: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Builds the article stage from the configuration
    ///
    /// Opens the corpus directory and the processed-link ledger and loads the
    /// lexicon when one is configured.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn PageSource>,
        segmenter: Box<dyn Segmenter>,
    ) -> Result<Self, CorpusError> {
        let extractor = Extractor::from_config(&config.corpus, config.cleaning);
        let encoder = Encoder::from_config(segmenter, &config.corpus)?;
        let writer = CorpusWriter::from_config(&config.corpus)?;
        let processed = LinkLedger::open(config.processed_path())?;

        let mut pipeline = Self::new(source, extractor, encoder, writer, processed);

        if let Some(path) = &config.corpus.lexicon_path {
            let lexicon = Lexicon::load(path)?;
            tracing::info!("Loaded {} lexicon terms from {}", lexicon.terms().len(), path.display());
            pipeline = pipeline.with_lexicon(lexicon);
        }

        Ok(pipeline)
    }

    /// Only writes articles containing a lexicon term
    ///
    /// The terms are also registered with the segmenter as whole words. An
    /// empty lexicon disables the filter.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        if lexicon.is_empty() {
            self.lexicon = None;
        } else {
            self.encoder.add_guaranteed_words(lexicon.terms());
            self.lexicon = Some(lexicon);
        }
        self
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn writer(&self) -> &CorpusWriter {
        &self.writer
    }

    pub fn processed(&self) -> &LinkLedger {
        &self.processed
    }

    /// Fetches, extracts, encodes and writes the article at `url`
    ///
    /// # Errors
    ///
    /// Returns the fetch, extraction or encoding failure for this article.
    pub async fn process(&self, url: &str) -> Result<ArticleOutcome, CorpusError> {
        let html = self.source.fetch(url).await?;
        let article = self.extractor.extract(&html, url)?;

        if let Some(lexicon) = &self.lexicon {
            match lexicon.first_match(&article.content) {
                Some(term) => tracing::trace!("{} matches lexicon term {}", url, term),
                None => return Ok(ArticleOutcome::NoLexiconMatch),
            }
        }

        let encoder = &self.encoder;
        let written = self.writer.write_with(&article.content, |id| {
            let document = encoder.encode_document(&article.content, &article.meta, id)?;
            let summary = encoder.summarize(&article.content)?;
            Ok((document, summary))
        })?;

        Ok(ArticleOutcome::Written(written))
    }

    /// Processes `links` in order, skipping those already in the ledger
    ///
    /// Written articles, lexicon misses and pages that are not posts are
    /// recorded in the ledger. Fetch and encode failures are not, so a later
    /// run retries them. The stop flag is checked before each link.
    ///
    /// # Errors
    ///
    /// Only a failure to update the ledger ends the run early.
    pub async fn run<I>(&mut self, links: I) -> Result<RunStatistics, CorpusError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut stats = RunStatistics::default();

        for url in links {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, leaving remaining links for the next run");
                stats.interrupted = true;
                break;
            }

            stats.links += 1;

            if self.processed.contains(&url) {
                tracing::debug!("Already processed: {}", url);
                stats.already_processed += 1;
                continue;
            }

            match self.process(&url).await {
                Ok(ArticleOutcome::Written(written)) => {
                    tracing::info!("Wrote {} from {}", written.id, url);
                    stats.written += 1;
                    self.processed.record(&url)?;
                }
                Ok(ArticleOutcome::NoLexiconMatch) => {
                    tracing::debug!("No lexicon term in {}", url);
                    stats.no_lexicon_match += 1;
                    self.processed.record(&url)?;
                }
                Err(CorpusError::Fetch(e)) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    stats.fetch_failures += 1;
                }
                Err(CorpusError::Extract(e)) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    stats.extract_failures += 1;
                    self.processed.record(&url)?;
                }
                Err(e) => {
                    tracing::warn!("Failed to write article from {}: {}", url, e);
                    stats.encode_failures += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// Runs the crawler and article stage as selected by `mode`
///
/// Links found by the crawl are appended to the link list before any article
/// is fetched, so an interrupted run can resume with `RunMode::NoCrawl`.
/// `make_segmenter` is only called when articles are processed.
pub async fn run<F>(
    config: &Config,
    mode: RunMode,
    source: Arc<dyn PageSource>,
    stop: Arc<AtomicBool>,
    make_segmenter: F,
) -> Result<RunStatistics, CorpusError>
where
    F: FnOnce() -> Box<dyn Segmenter>,
{
    let mut link_list = LinkLedger::open(config.link_list_path())?;

    let (links, discovered) = match mode {
        RunMode::Full | RunMode::LinksOnly => {
            let crawler =
                LinkCrawler::from_config(config, source.clone())?.with_stop_flag(stop.clone());

            let found = crawler
                .crawl(
                    config.crawler.start_page,
                    config.crawler.max_links,
                    config.crawler.rate_interval,
                    config.crawler.pause_seconds,
                )
                .await?;

            let mut added = 0;
            for link in found.iter() {
                if link_list.record(link)? {
                    added += 1;
                }
            }
            tracing::info!(
                "Crawl found {} links ({} new to {})",
                found.len(),
                added,
                link_list.path().display()
            );

            let discovered = found.len();
            (found.into_iter().collect::<Vec<_>>(), discovered)
        }
        RunMode::NoCrawl => {
            let path = link_list.path();
            let links = if path.exists() {
                let mut seen = HashSet::new();
                read_link_list(path)?
                    .into_iter()
                    .filter(|link| seen.insert(link.clone()))
                    .collect()
            } else {
                tracing::warn!("No link list at {}", path.display());
                Vec::new()
            };
            (links, 0)
        }
    };

    if mode == RunMode::LinksOnly {
        return Ok(RunStatistics {
            discovered,
            interrupted: stop.load(Ordering::SeqCst),
            ..Default::default()
        });
    }

    let mut pipeline =
        Pipeline::from_config(config, source, make_segmenter())?.with_stop_flag(stop);
    tracing::info!(
        "Processing {} links into {} ({} documents so far)",
        links.len(),
        config.corpus.output_dir.display(),
        pipeline.writer().count()
    );

    let mut stats = pipeline.run(links).await?;
    stats.discovered = discovered;
    Ok(stats)
}
