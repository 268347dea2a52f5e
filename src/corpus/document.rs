//! VRT-style corpus documents
//!
//! ```text
//! <text author="..." ... id="PTT_News00001">
//! <p>
//! <s>
//! word<TAB>tag
//! </s>
//! </p>
//! </text>
//! ```
//!
//! The closing `</text>` is not followed by a newline.

use super::segmenter::Token;
use std::fmt;

/// A segmented sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

/// A run of sentences separated from its neighbours by blank lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub sentences: Vec<Sentence>,
}

/// One annotated article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Header attributes in output order, `id` last
    pub attributes: Vec<(String, String)>,
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Value of the `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.as_str())
    }

    /// Every token in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.sentences.iter())
            .flat_map(|s| s.tokens.iter())
    }

    /// Serializes the document
    pub fn to_vrt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<text")?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, escape_attribute(value))?;
        }
        writeln!(f, ">")?;

        for paragraph in &self.paragraphs {
            writeln!(f, "<p>")?;
            for sentence in &paragraph.sentences {
                writeln!(f, "<s>")?;
                for token in &sentence.tokens {
                    writeln!(f, "{}\t{}", token.surface, token.tag)?;
                }
                writeln!(f, "</s>")?;
            }
            writeln!(f, "</p>")?;
        }

        write!(f, "</text>")
    }
}

/// Keeps an attribute value on one line and inside its quotes
fn escape_attribute(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace(['\n', '\r', '\t'], " ")
}
