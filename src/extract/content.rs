//! Main body extraction
//!
//! The body sits between the header block and the post signature. Authors and
//! older versions of the site format that boundary differently, so a fixed list
//! of templates is tried in order and the first match wins.

use crate::ExtractError;
use lazy_static::lazy_static;
use regex::Regex;

/// One known layout of the body block; group 1 captures the body
struct ContentTemplate {
    name: &'static str,
    pattern: Regex,
}

lazy_static! {
    static ref TEMPLATES: Vec<ContentTemplate> = vec![
        // Header, body, `--` delimiter, optional IP line, then the signature
        ContentTemplate {
            name: "signed",
            pattern: Regex::new(
                r#"(?s)<div id="main-content"[^>]*>.*meta-value">.*?</div>(.*?)\n--+\n(?:[^\n]*\n)?(?:Sent|<span[^>]*>※\s發信站)"#,
            )
            .unwrap(),
        },
        // Older posts end at the site footer without a `--` delimiter
        ContentTemplate {
            name: "footer",
            pattern: Regex::new(
                r#"(?s)<div id="main-content"[^>]*>.*meta-value">.*?</div>(.*?)※\s發信站:\s批踢踢實業坊"#,
            )
            .unwrap(),
        },
        // Posts whose header block was edited away
        ContentTemplate {
            name: "headerless",
            pattern: Regex::new(
                r#"(?s)<div id="main-content"[^>]*>(.*?)\n--+\n(?:[^\n]*\n)?(?:Sent|<span[^>]*>※\s發信站)"#,
            )
            .unwrap(),
        },
    ];
}

/// Extracts the raw body of a post
///
/// # Errors
///
/// Returns `ExtractError::ContentNotFound` when no template matches. Callers
/// treat this as "nothing found" and carry on with an empty body.
pub fn extract_content(html: &str) -> Result<String, ExtractError> {
    for template in TEMPLATES.iter() {
        if let Some(body) = template.pattern.captures(html).and_then(|c| c.get(1)) {
            tracing::trace!("Content matched template '{}'", template.name);
            return Ok(body.as_str().to_string());
        }
    }

    Err(ExtractError::ContentNotFound)
}
