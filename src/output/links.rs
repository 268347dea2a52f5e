//! Processed-link ledger
//!
//! A plain text file with one URL per line. Lines are only ever appended, so
//! an interrupted run loses at most the link it was working on.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Reads a newline-delimited URL list, skipping blank lines and `#` comments
pub fn read_link_list(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut links = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            links.push(line.to_string());
        }
    }

    Ok(links)
}

/// URLs already turned into corpus files (or found not to be articles)
#[derive(Debug)]
pub struct LinkLedger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl LinkLedger {
    /// Opens a ledger, loading it when the file exists
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let seen = if path.exists() {
            read_link_list(&path)?.into_iter().collect()
        } else {
            HashSet::new()
        };

        tracing::debug!("Loaded {} processed links from {}", seen.len(), path.display());
        Ok(Self { path, seen })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Appends a URL; returns false when it was already recorded
    pub fn record(&mut self, url: &str) -> io::Result<bool> {
        if self.seen.contains(url) {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", url)?;

        self.seen.insert(url.to_string());
        Ok(true)
    }
}
