//! Corpus encoding
//!
//! Turns a cleaned article into a VRT-style `Document` and a frequency
//! `Summary`. Segmentation is delegated to an injected `Segmenter`.

mod document;
mod lexicon;
mod segmenter;
mod split;
mod summary;

pub use document::{Document, Paragraph, Sentence};
pub use lexicon::Lexicon;
#[cfg(feature = "jieba")]
pub use segmenter::JiebaSegmenter;
pub use segmenter::{Segmenter, Token};
pub use split::{multisplit, split_paragraphs, KeepDelimiter, Splitter};
pub use summary::Summary;

use crate::config::CorpusConfig;
use crate::extract::ArticleMeta;
use crate::EncodeError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
}

/// Encodes articles with a fixed segmenter and sentence splitter
pub struct Encoder {
    segmenter: Box<dyn Segmenter>,
    splitter: Option<Splitter>,
}

impl Encoder {
    /// Creates an encoder; without a splitter every line is a sentence
    pub fn new(segmenter: Box<dyn Segmenter>, splitter: Option<Splitter>) -> Self {
        Self {
            segmenter,
            splitter,
        }
    }

    /// Creates an encoder using the configured sentence delimiters
    pub fn from_config(
        segmenter: Box<dyn Segmenter>,
        config: &CorpusConfig,
    ) -> Result<Self, EncodeError> {
        let splitter = if config.sentence_delimiters.is_empty() {
            None
        } else {
            Some(Splitter::new(
                &config.sentence_delimiters,
                config.delimiters_are_regex,
                config.keep_delimiter,
            )?)
        };

        Ok(Self::new(segmenter, splitter))
    }

    /// Registers lexicon terms as unsplittable words
    pub fn add_guaranteed_words(&mut self, words: &[String]) {
        self.segmenter.add_guaranteed_words(words);
    }

    /// Encodes `content` into a document whose header ends with `id="doc_id"`
    ///
    /// Blank sentences and paragraphs without any sentence are left out.
    pub fn encode_document(
        &self,
        content: &str,
        meta: &ArticleMeta,
        doc_id: &str,
    ) -> Result<Document, EncodeError> {
        let mut attributes: Vec<(String, String)> = meta
            .attributes()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        attributes.push(("id".to_string(), doc_id.to_string()));

        let mut paragraphs = Vec::new();
        for raw_paragraph in split_paragraphs(content, self.splitter.as_ref()) {
            let mut sentences = Vec::new();

            for raw_sentence in raw_paragraph {
                if raw_sentence.trim().is_empty() {
                    continue;
                }

                let text = LINE_BREAKS.replace_all(&raw_sentence, " ");
                let tokens = self.segmenter.segment(&text, true)?;
                if !tokens.is_empty() {
                    sentences.push(Sentence { tokens });
                }
            }

            if !sentences.is_empty() {
                paragraphs.push(Paragraph { sentences });
            }
        }

        Ok(Document {
            attributes,
            paragraphs,
        })
    }

    /// Builds the frequency summary of `content`, or `None` if it is empty
    pub fn summarize(&self, content: &str) -> Result<Option<Summary>, EncodeError> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let text = LINE_BREAKS.replace_all(content, " ");
        let tokens = self.segmenter.segment(&text, false)?;

        Ok(Some(Summary::from_surfaces(
            tokens.iter().map(|t| t.surface.as_str()),
        )))
    }
}
