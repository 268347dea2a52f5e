//! Index page parsing
//!
//! An index page lists posts as anchors. The crawler keeps the anchors whose
//! text starts with the configured category tag.

use scraper::{Html, Selector};
use url::Url;

/// An anchor found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    /// Visible anchor text, trimmed
    pub text: String,

    /// Raw `href` value
    pub href: String,
}

/// Collects the anchors matched by `selector`
///
/// Elements without an `href` (deleted posts keep their title but lose the
/// link) are skipped.
pub fn select_links(html: &str, selector: &Selector) -> Vec<AnchorLink> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(AnchorLink {
                text: element.text().collect::<String>().trim().to_string(),
                href: href.trim().to_string(),
            })
        })
        .collect()
}

/// Whether an anchor's text starts with the category tag
pub fn has_title_tag(text: &str, tag: &str) -> bool {
    text.trim_start().starts_with(tag)
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, fragments, special schemes and anything
/// that does not resolve to HTTP(S).
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
