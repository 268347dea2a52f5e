//! Body cleaning passes
//!
//! Passes run in a fixed order: tags, URLs, entities, then a trim. The
//! sequence is repeated until the text stops changing, so cleaning an already
//! clean body is a no-op even when decoding produces new markup.

use crate::config::CleaningConfig;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAG: Regex = Regex::new(r"</?[^>]*>").unwrap();
    static ref URL: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(?:amp|lt|gt|quot|#39);").unwrap();
}

/// Cleans a post body according to `options`
pub fn clean(content: &str, options: &CleaningConfig) -> String {
    let mut current = clean_once(content, options);

    // Every effective pass shortens the text, so this terminates
    loop {
        let next = clean_once(&current, options);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(content: &str, options: &CleaningConfig) -> String {
    let mut text = content.to_string();

    if options.strip_tags {
        text = TAG.replace_all(&text, "").into_owned();
    }

    if options.strip_urls {
        text = URL.replace_all(&text, "").into_owned();
    }

    if options.decode_entities {
        text = ENTITY
            .replace_all(&text, |caps: &Captures| decode_entity(&caps[0]))
            .into_owned();
    }

    text.trim().to_string()
}

fn decode_entity(entity: &str) -> &'static str {
    match entity {
        "&amp;" => "&",
        "&lt;" => "<",
        "&gt;" => ">",
        "&quot;" => "\"",
        "&#39;" => "'",
        _ => "",
    }
}
