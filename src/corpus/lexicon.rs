//! Required-term word list
//!
//! Terms are registered with the segmenter as single words and used to pick
//! which articles make it into the corpus.

use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    terms: Vec<String>,
}

impl Lexicon {
    pub fn new(terms: Vec<String>) -> Self {
        let terms = terms
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Loads one term per line
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text.lines().map(str::to_string).collect()))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the first term occurring in `content`
    pub fn first_match(&self, content: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|term| content.contains(term.as_str()))
            .map(String::as_str)
    }
}
