//! Run statistics

/// Counters collected while processing links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Links found by the index crawl
    pub discovered: usize,

    /// Links handed to the article stage
    pub links: usize,

    /// Links skipped because the ledger already had them
    pub already_processed: usize,

    /// Articles written to the corpus
    pub written: usize,

    /// Articles without any lexicon term
    pub no_lexicon_match: usize,

    /// Links whose page could not be fetched
    pub fetch_failures: usize,

    /// Pages that did not look like an article
    pub extract_failures: usize,

    /// Articles that failed to encode or write
    pub encode_failures: usize,

    /// Whether the run ended early on a stop request
    pub interrupted: bool,
}

impl RunStatistics {
    pub fn failures(&self) -> usize {
        self.fetch_failures + self.extract_failures + self.encode_failures
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Links:");
    println!("  Discovered: {}", stats.discovered);
    println!("  Queued: {}", stats.links);
    println!("  Already processed: {}", stats.already_processed);
    println!();

    println!("Articles:");
    println!("  Written: {}", stats.written);
    println!("  No lexicon match: {}", stats.no_lexicon_match);
    println!();

    if stats.failures() > 0 {
        println!("Failures:");
        println!("  Fetch: {}", stats.fetch_failures);
        println!("  Extract: {}", stats.extract_failures);
        println!("  Encode: {}", stats.encode_failures);
        println!();
    }

    if stats.interrupted {
        println!("Run was interrupted before all links were processed.");
    }
}
