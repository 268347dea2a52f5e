//! Paragraph and sentence splitting

use crate::EncodeError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n{2,}").unwrap();
}

/// What happens to a matched delimiter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepDelimiter {
    /// Drop it
    Discard,
    /// Attach it to the end of the preceding segment
    #[default]
    Append,
    /// Attach it to the start of the following segment
    Prepend,
}

impl TryFrom<u8> for KeepDelimiter {
    type Error = u8;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Discard),
            1 => Ok(Self::Append),
            2 => Ok(Self::Prepend),
            other => Err(other),
        }
    }
}

/// A compiled set of delimiters
///
/// Compiling once per run keeps the regex cost out of the per-sentence loop.
#[derive(Debug, Clone)]
pub struct Splitter {
    pattern: Option<Regex>,
    keep: KeepDelimiter,
}

impl Splitter {
    /// Builds a splitter matching any of `delimiters`
    ///
    /// Literal delimiters are escaped and tried longest first, so `。」`
    /// wins over `。` at the same position. Regex delimiters are tried in
    /// the order given.
    pub fn new<S: AsRef<str>>(
        delimiters: &[S],
        use_regex: bool,
        keep: KeepDelimiter,
    ) -> Result<Self, EncodeError> {
        let mut alternatives: Vec<String> = delimiters
            .iter()
            .map(|d| d.as_ref())
            .filter(|d| !d.is_empty())
            .map(|d| {
                if use_regex {
                    format!("(?:{})", d)
                } else {
                    regex::escape(d)
                }
            })
            .collect();

        if !use_regex {
            alternatives.sort_by_key(|a| std::cmp::Reverse(a.chars().count()));
        }

        // An empty set never matches, which leaves the text whole
        let pattern = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&alternatives.join("|"))?)
        };

        Ok(Self { pattern, keep })
    }

    /// Splits `text`, never returning empty segments
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut segments = Vec::new();
        let mut start = 0;

        let pattern = match &self.pattern {
            Some(pattern) => pattern,
            None => {
                push_segment(&mut segments, text);
                return segments;
            }
        };

        for m in pattern.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }

            match self.keep {
                KeepDelimiter::Discard => {
                    push_segment(&mut segments, &text[start..m.start()]);
                    start = m.end();
                }
                KeepDelimiter::Append => {
                    push_segment(&mut segments, &text[start..m.end()]);
                    start = m.end();
                }
                KeepDelimiter::Prepend => {
                    push_segment(&mut segments, &text[start..m.start()]);
                    start = m.start();
                }
            }
        }

        push_segment(&mut segments, &text[start..]);
        segments
    }
}

fn push_segment(segments: &mut Vec<String>, segment: &str) {
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
}

/// Splits `text` on any of `delimiters`
///
/// # Example
///
/// ```
/// use ptt_corpus::corpus::{multisplit, KeepDelimiter};
///
/// let parts = multisplit("A。B！", &["。", "！"], false, KeepDelimiter::Append).unwrap();
/// assert_eq!(parts, vec!["A。", "B！"]);
/// ```
pub fn multisplit<S: AsRef<str>>(
    text: &str,
    delimiters: &[S],
    use_regex: bool,
    keep: KeepDelimiter,
) -> Result<Vec<String>, EncodeError> {
    Ok(Splitter::new(delimiters, use_regex, keep)?.split(text))
}

/// Splits content into paragraphs of sentences
///
/// Paragraphs are separated by two or more newlines. With a `splitter`
/// each paragraph is cut into sentences; without one every line is a
/// sentence. Blank sentences are kept here and filtered by the encoder.
pub fn split_paragraphs(content: &str, splitter: Option<&Splitter>) -> Vec<Vec<String>> {
    PARAGRAPH_BREAK
        .split(content)
        .map(|paragraph| match splitter {
            Some(splitter) => splitter.split(paragraph),
            None => paragraph.lines().map(str::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str, delimiters: &[&str], keep: KeepDelimiter) -> Vec<String> {
        multisplit(text, delimiters, false, keep).unwrap()
    }

    #[test]
    fn test_append_keeps_punctuation_with_sentence() {
        assert_eq!(
            split("A。B！", &["。", "！"], KeepDelimiter::Append),
            vec!["A。", "B！"]
        );
    }

    #[test]
    fn test_discard() {
        assert_eq!(
            split("A。B！C", &["。", "！"], KeepDelimiter::Discard),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_prepend() {
        assert_eq!(
            split("A。B！C", &["。", "！"], KeepDelimiter::Prepend),
            vec!["A", "。B", "！C"]
        );
    }

    #[test]
    fn test_consecutive_and_boundary_delimiters() {
        assert_eq!(
            split("。A。。B", &["。"], KeepDelimiter::Append),
            vec!["。", "A。", "。", "B"]
        );
        assert_eq!(
            split("。A。。B。", &["。"], KeepDelimiter::Discard),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_append_reconstructs_input() {
        let samples = [
            "他說：「好。」然後走了！真的？",
            "。。。",
            "沒有句號",
            "",
            "A。」B？」C！",
        ];
        let delimiters = ["。」?", "？」?", "！」?"];

        for sample in samples {
            let parts = multisplit(sample, &delimiters, true, KeepDelimiter::Append).unwrap();
            assert_eq!(parts.concat(), sample);
        }
    }

    #[test]
    fn test_regex_delimiters_take_closing_quote() {
        let parts = multisplit(
            "他說：「好。」然後走了！",
            &["。」?", "！」?"],
            true,
            KeepDelimiter::Append,
        )
        .unwrap();
        assert_eq!(parts, vec!["他說：「好。」", "然後走了！"]);
    }

    #[test]
    fn test_literal_delimiters_are_escaped() {
        assert_eq!(
            split("a.b*c", &[".", "*"], KeepDelimiter::Discard),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_longest_literal_wins() {
        assert_eq!(
            split("好。」嗎", &["。", "。」"], KeepDelimiter::Append),
            vec!["好。」", "嗎"]
        );
    }

    #[test]
    fn test_invalid_regex() {
        let result = multisplit("x", &["("], true, KeepDelimiter::Append);
        assert!(matches!(result, Err(EncodeError::Delimiter(_))));
    }

    #[test]
    fn test_no_delimiters_keeps_text_whole() {
        let empty: [&str; 0] = [];
        assert_eq!(split("整段", &empty, KeepDelimiter::Append), vec!["整段"]);
    }

    #[test]
    fn test_keep_mode_from_int() {
        assert_eq!(KeepDelimiter::try_from(0), Ok(KeepDelimiter::Discard));
        assert_eq!(KeepDelimiter::try_from(1), Ok(KeepDelimiter::Append));
        assert_eq!(KeepDelimiter::try_from(2), Ok(KeepDelimiter::Prepend));
        assert_eq!(KeepDelimiter::try_from(3), Err(3));
    }

    #[test]
    fn test_split_paragraphs_by_lines() {
        let paragraphs = split_paragraphs("一行\n兩行\n\n\n第二段", None);
        assert_eq!(paragraphs, vec![vec!["一行", "兩行"], vec!["第二段"]]);
    }

    #[test]
    fn test_split_paragraphs_by_sentences() {
        let splitter = Splitter::new(&["。"], false, KeepDelimiter::Append).unwrap();
        let paragraphs = split_paragraphs("第一句。第二\n句。\n\n第三句。", Some(&splitter));
        assert_eq!(
            paragraphs,
            vec![vec!["第一句。", "第二\n句。"], vec!["第三句。"]]
        );
    }
}
