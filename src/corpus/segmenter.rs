//! Word segmentation boundary
//!
//! The encoder only depends on the `Segmenter` trait. The bundled
//! implementation wraps `jieba-rs`.

use crate::EncodeError;

/// One segmented word and its tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub surface: String,
    /// Part-of-speech or pseudo tag; empty when tagging was not requested
    pub tag: String,
}

impl Token {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }
}

/// Splits text into an ordered sequence of tokens
pub trait Segmenter: Send + Sync {
    /// Segments `text`; with `tagged` false every token's tag is empty
    fn segment(&self, text: &str, tagged: bool) -> Result<Vec<Token>, EncodeError>;

    /// Registers words that must always come out as a single token
    ///
    /// Segmenters without a user dictionary ignore this.
    fn add_guaranteed_words(&mut self, words: &[String]) {
        let _ = words;
    }
}

#[cfg(feature = "jieba")]
pub use self::jieba::JiebaSegmenter;

#[cfg(feature = "jieba")]
mod jieba {
    use super::{Segmenter, Token};
    use crate::EncodeError;
    use jieba_rs::Jieba;

    /// `Segmenter` backed by the jieba dictionary and HMM
    pub struct JiebaSegmenter {
        jieba: Jieba,
        hmm: bool,
    }

    impl JiebaSegmenter {
        pub fn new() -> Self {
            Self {
                jieba: Jieba::new(),
                hmm: true,
            }
        }
    }

    impl Default for JiebaSegmenter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Segmenter for JiebaSegmenter {
        fn segment(&self, text: &str, tagged: bool) -> Result<Vec<Token>, EncodeError> {
            // Whitespace runs are separators, not words
            let tokens = if tagged {
                self.jieba
                    .tag(text, self.hmm)
                    .into_iter()
                    .filter(|t| !t.word.trim().is_empty())
                    .map(|t| Token::new(t.word, t.tag))
                    .collect()
            } else {
                self.jieba
                    .cut(text, self.hmm)
                    .into_iter()
                    .filter(|w| !w.trim().is_empty())
                    .map(|w| Token::new(w, ""))
                    .collect()
            };

            Ok(tokens)
        }

        fn add_guaranteed_words(&mut self, words: &[String]) {
            for word in words {
                self.jieba.add_word(word, None, None);
            }
        }
    }

}
