//! Corpus file writer
//!
//! Every article gets the next id from a single counter. Its files are staged
//! as temporary files in the corpus directory and renamed into place only
//! once everything has been encoded, so a failed article leaves nothing
//! behind and does not use up an id. Existing files are never overwritten.

use crate::config::CorpusConfig;
use crate::corpus::{Document, Summary};
use crate::EncodeError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Paths written for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArticle {
    pub id: String,
    pub document: PathBuf,
    pub summary: Option<PathBuf>,
    pub text: Option<PathBuf>,
}

/// Writes `<id>.vrt`, `<id>.json` and optionally `<id>.txt` files
#[derive(Debug)]
pub struct CorpusWriter {
    dir: PathBuf,
    prefix: String,
    width: usize,
    write_text: bool,
    count: Mutex<u64>,
}

impl CorpusWriter {
    /// Opens (creating if needed) a corpus directory
    ///
    /// Numbering resumes after the highest `<prefix><digits>.vrt` id already
    /// in the directory, so gaps left by deleted documents are not reused.
    pub fn open(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        width: usize,
        write_text: bool,
    ) -> io::Result<Self> {
        let dir = dir.into();
        let prefix = prefix.into();
        fs::create_dir_all(&dir)?;

        let existing = highest_document_number(&dir, &prefix)?;
        tracing::debug!(
            "Corpus directory {} has documents up to number {}",
            dir.display(),
            existing
        );

        Ok(Self {
            dir,
            prefix,
            width,
            write_text,
            count: Mutex::new(existing),
        })
    }

    pub fn from_config(config: &CorpusConfig) -> io::Result<Self> {
        Self::open(
            &config.output_dir,
            &config.prefix,
            config.id_width,
            config.write_plain_text,
        )
    }

    /// Number of the last document id handed out, 0 for an empty corpus
    pub fn count(&self) -> u64 {
        *self.count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Document id for sequence number `n`, e.g. `PTT_News00042`
    pub fn doc_id(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }

    /// Encodes and writes one article
    ///
    /// `encode` receives the id the article will get. The counter stays
    /// locked until the files are in place, which keeps ids unique and
    /// gapless when several tasks write concurrently.
    ///
    /// # Errors
    ///
    /// Any error from `encode` or from writing aborts the article; no file
    /// is left behind and the counter is unchanged.
    pub fn write_with<F>(&self, content: &str, encode: F) -> Result<WrittenArticle, EncodeError>
    where
        F: FnOnce(&str) -> Result<(Document, Option<Summary>), EncodeError>,
    {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        let next = *count + 1;
        let id = self.doc_id(next);

        let (document, summary) = encode(&id)?;

        let mut staged = vec![(
            self.stage(document.to_vrt().as_bytes())?,
            self.dir.join(format!("{}.vrt", id)),
        )];

        let summary_path = match summary {
            Some(summary) => {
                let path = self.dir.join(format!("{}.json", id));
                staged.push((self.stage(summary.to_json()?.as_bytes())?, path.clone()));
                Some(path)
            }
            None => None,
        };

        let text_path = if self.write_text {
            let path = self.dir.join(format!("{}.txt", id));
            staged.push((self.stage(content.as_bytes())?, path.clone()));
            Some(path)
        } else {
            None
        };

        persist_all(staged)?;
        *count = next;

        Ok(WrittenArticle {
            document: self.dir.join(format!("{}.vrt", id)),
            id,
            summary: summary_path,
            text: text_path,
        })
    }

    fn stage(&self, bytes: &[u8]) -> io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }
}

/// Moves staged files into place, removing the ones already moved on failure
///
/// A target that already exists is an error and is left untouched.
fn persist_all(staged: Vec<(NamedTempFile, PathBuf)>) -> io::Result<()> {
    let mut persisted: Vec<PathBuf> = Vec::new();

    for (file, path) in staged {
        if let Err(e) = file.persist_noclobber(&path) {
            for done in &persisted {
                let _ = fs::remove_file(done);
            }
            return Err(e.into());
        }
        persisted.push(path);
    }

    Ok(())
}

fn highest_document_number(dir: &Path, prefix: &str) -> io::Result<u64> {
    let mut highest = 0;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        let number = name
            .strip_suffix(".vrt")
            .and_then(|stem| stem.strip_prefix(prefix))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok());
        if let Some(number) = number {
            highest = highest.max(number);
        }
    }
    Ok(highest)
}
