//! Embedded news citation block
//!
//! News reposts are expected to quote the original article in five labelled
//! fields. Authors number them (`1.媒體來源:`), leave the numbers out, or
//! ignore the form entirely. Numbered and unnumbered blocks are recognized;
//! free-form posts fall through to empty fields.

use super::meta::CitationMeta;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CITATION_BLOCK: Regex = Regex::new(
        r"(?s)(?:\d\.)?\s*媒體來源\s*[:：](?P<media>.*?)(?:\d\.)?\s*完整新聞標題\s*[:：](?P<news_title>.*?)(?:\d\.)?\s*完整新聞內文\s*[:：](?P<news_content>.*?)(?:\d\.)?\s*完整新聞連結\s*[(（]或短網址[)）]\s*[:：](?P<news_url>.*?)(?:(?:\d\.)?\s*備註\s*[:：](?P<note>.*?))?\s*(?:\n--+\n.*)?\z"
    )
    .unwrap();
    static ref HREF: Regex = Regex::new(r#"href="([^"]*)""#).unwrap();
    static ref BARE_URL: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

/// Looks for a citation block in a post body
///
/// Returns the citation fields and the working content. When the block
/// carries a non-empty article body, that body replaces the post content.
/// Without a block every field is empty and the content is returned as is.
pub fn extract_embedded_meta(content: &str) -> (CitationMeta, String) {
    let captures = match CITATION_BLOCK.captures(content) {
        Some(captures) => captures,
        None => return (CitationMeta::default(), content.to_string()),
    };

    let field = |name: &str| {
        captures
            .name(name)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    let citation = CitationMeta {
        media: field("media"),
        news_title: field("news_title"),
        news_url: reduce_news_url(&field("news_url")),
        note: field("note"),
    };

    let news_content = field("news_content");
    let content = if news_content.is_empty() {
        content.to_string()
    } else {
        news_content
    };

    (citation, content)
}

/// Reduces the URL field to the anchor's href, a bare URL, or nothing
fn reduce_news_url(field: &str) -> String {
    if let Some(href) = HREF.captures(field).and_then(|c| c.get(1)) {
        return href.as_str().to_string();
    }

    if BARE_URL.is_match(field) {
        return field.to_string();
    }

    String::new()
}
