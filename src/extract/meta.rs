//! Header metadata extraction
//!
//! A post starts with a run of `meta-tag` / `meta-value` span pairs
//! (author, board, title, time). Each label maps onto a fixed key.

use crate::ExtractError;
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

lazy_static! {
    static ref META_TAG: Selector = Selector::parse(r#"span[class$="meta-tag"]"#).unwrap();
    static ref META_VALUE: Selector = Selector::parse(r#"span[class$="meta-value"]"#).unwrap();
    static ref REAL_NAME: Regex = Regex::new(r"\s*\(.*$").unwrap();
}

/// Timestamp format of the `時間` header, e.g. `Tue Mar 8 11:05:33 2016`
const POST_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Citation fields, present once the body has been checked for a citation block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationMeta {
    pub media: String,
    pub news_title: String,
    pub news_url: String,
    pub note: String,
}

/// Metadata of one forum post
///
/// Absent values are empty strings. `citation` is `None` only while the
/// body has not been inspected yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMeta {
    pub author: String,
    pub board: String,
    pub title: String,
    pub date: String,
    pub source: String,
    pub article_type: String,
    pub origin_url: String,
    pub citation: Option<CitationMeta>,
}

impl ArticleMeta {
    /// Returns the attributes in their fixed serialization order
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = vec![
            ("author", self.author.as_str()),
            ("board", self.board.as_str()),
            ("title", self.title.as_str()),
            ("date", self.date.as_str()),
            ("source", self.source.as_str()),
            ("article_type", self.article_type.as_str()),
            ("origin_url", self.origin_url.as_str()),
        ];

        if let Some(citation) = &self.citation {
            attrs.extend([
                ("media", citation.media.as_str()),
                ("news_title", citation.news_title.as_str()),
                ("news_url", citation.news_url.as_str()),
                ("note", citation.note.as_str()),
            ]);
        }

        attrs
    }
}

/// Header label recognized in a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaField {
    Author,
    Board,
    Title,
    Time,
}

impl MetaField {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "作者" => Some(Self::Author),
            "看板" => Some(Self::Board),
            "標題" => Some(Self::Title),
            "時間" => Some(Self::Time),
            _ => None,
        }
    }
}

/// Extracts author, board, title and date from a post's header
///
/// # Errors
///
/// Returns `ExtractError::UnknownMetaLabel` if the header carries a label
/// outside the known set, which means the page is not a post.
pub fn extract_meta(html: &str) -> Result<ArticleMeta, ExtractError> {
    let document = Html::parse_document(html);
    let mut meta = ArticleMeta::default();

    let tags = document.select(&META_TAG);
    let values = document.select(&META_VALUE);

    for (tag, value) in tags.zip(values) {
        let label = tag.text().collect::<String>();
        let label = label.trim();
        let value = value.text().collect::<String>();

        let field = MetaField::from_label(label)
            .ok_or_else(|| ExtractError::UnknownMetaLabel(label.to_string()))?;

        match field {
            MetaField::Author => meta.author = strip_real_name(&value),
            MetaField::Board => meta.board = value.trim().to_string(),
            MetaField::Title => meta.title = value.trim().to_string(),
            MetaField::Time => meta.date = parse_post_date(&value),
        }
    }

    Ok(meta)
}

/// Drops the trailing `(real name)` annotation from an author field
fn strip_real_name(author: &str) -> String {
    REAL_NAME.replace(author.trim(), "").to_string()
}

/// Reformats a post timestamp as an ISO date, or empty if it does not parse
fn parse_post_date(value: &str) -> String {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");

    match NaiveDateTime::parse_from_str(&normalized, POST_TIME_FORMAT) {
        Ok(datetime) => datetime.format("%Y-%m-%d").to_string(),
        Err(e) => {
            tracing::debug!("Unparseable post time '{}': {}", value, e);
            String::new()
        }
    }
}
