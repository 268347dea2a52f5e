//! PTT-Corpus main entry point
//!
//! This is the command-line interface for the PTT news-repost harvester.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use ptt_corpus::config::{load_config_with_hash, Config};
use ptt_corpus::corpus::{JiebaSegmenter, Segmenter};
use ptt_corpus::crawler::HttpFetcher;
use ptt_corpus::output::print_statistics;
use ptt_corpus::pipeline::{self, RunMode};
use ptt_corpus::CrawlError;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// PTT-Corpus: a news-repost harvester
///
/// Walks a board's index pages for news reposts and writes every article as
/// a segmented, POS-tagged VRT document with a word frequency summary.
#[derive(Parser, Debug)]
#[command(name = "ptt-corpus")]
#[command(version = "1.0.0")]
#[command(about = "Builds a VRT corpus from PTT news reposts", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without any network access
    #[arg(long, conflicts_with_all = ["links_only", "no_crawl"])]
    dry_run: bool,

    /// Crawl the index and record the links found, without fetching articles
    #[arg(long, conflicts_with = "no_crawl")]
    links_only: bool,

    /// Skip the crawl and process unprocessed links from the saved link list
    #[arg(long)]
    no_crawl: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load and validate configuration before touching the log file
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    setup_logging(cli.verbose, cli.quiet, config.output.log_path.as_deref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let mode = if cli.links_only {
        RunMode::LinksOnly
    } else if cli.no_crawl {
        RunMode::NoCrawl
    } else {
        RunMode::Full
    };

    handle_run(&config, mode).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a log path the formatted log goes to that file instead of stderr.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ptt_corpus=info,warn"),
            1 => EnvFilter::new("ptt_corpus=debug,info"),
            2 => EnvFilter::new("ptt_corpus=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== PTT-Corpus Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Index URL: {}", config.crawler.index_url);
    println!("  Start page: {}", config.crawler.start_page);
    println!("  Max links: {}", config.crawler.max_links);
    println!(
        "  Pause: {}s every {} links",
        config.crawler.pause_seconds, config.crawler.rate_interval
    );
    println!("  Title tag: {}", config.crawler.title_tag);
    println!("  Link selector: {}", config.crawler.link_selector);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nCorpus:");
    println!("  Directory: {}", config.corpus.output_dir.display());
    println!(
        "  Ids: {}{}",
        config.corpus.prefix,
        "0".repeat(config.corpus.id_width)
    );
    println!(
        "  Sentence delimiters ({}): {}",
        if config.corpus.delimiters_are_regex {
            "regex"
        } else {
            "literal"
        },
        config.corpus.sentence_delimiters.join(" ")
    );
    println!("  Keep delimiter: {:?}", config.corpus.keep_delimiter);
    if let Some(lexicon) = &config.corpus.lexicon_path {
        println!("  Lexicon: {}", lexicon.display());
    }
    println!("  Plain text copies: {}", config.corpus.write_plain_text);

    println!("\nOutput:");
    println!("  Link list: {}", config.link_list_path().display());
    println!("  Processed ledger: {}", config.processed_path().display());
    if let Some(log) = &config.output.log_path {
        println!("  Log: {}", log.display());
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would walk index pages {} down to 1 collecting up to {} links",
        config.crawler.start_page, config.crawler.max_links
    );
}

/// Handles a crawl and/or article run
async fn handle_run(config: &Config, mode: RunMode) -> Result<(), Box<dyn std::error::Error>> {
    let started = Local::now();
    tracing::info!("Run started at {} ({:?})", started.format("%Y-%m-%d %H:%M:%S"), mode);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing the current item");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    let timeout = Duration::from_secs(config.crawler.timeout_seconds);
    let fetcher =
        HttpFetcher::from_config(&config.user_agent, timeout).map_err(CrawlError::Client)?;

    let make_segmenter = || -> Box<dyn Segmenter> { Box::new(JiebaSegmenter::new()) };
    let result = pipeline::run(config, mode, Arc::new(fetcher), stop, make_segmenter).await;

    let finished = Local::now();
    match result {
        Ok(stats) => {
            tracing::info!(
                "Run finished at {} after {}s",
                finished.format("%Y-%m-%d %H:%M:%S"),
                (finished - started).num_seconds()
            );
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed at {}: {}", finished.format("%Y-%m-%d %H:%M:%S"), e);
            Err(e.into())
        }
    }
}
