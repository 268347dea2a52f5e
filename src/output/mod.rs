//! Output module for corpus files and run bookkeeping
//!
//! This module handles:
//! - Writing `.vrt`/`.json` (and optional `.txt`) files per article
//! - The ledger of links already processed
//! - Run statistics

mod links;
pub mod stats;
mod writer;

pub use links::{read_link_list, LinkLedger};
pub use stats::{print_statistics, RunStatistics};
pub use writer::{CorpusWriter, WrittenArticle};
