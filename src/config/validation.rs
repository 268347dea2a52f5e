use crate::config::types::{Config, CorpusConfig, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_corpus_config(&config.corpus)?;
    Ok(())
}

/// Validates the numeric bounds of a crawl and returns the pause length
///
/// Shared by config loading and `LinkCrawler::crawl`, so a crawl started
/// programmatically is held to the same rules as one started from a file.
pub fn validate_crawl_bounds(
    start_page: u32,
    max_links: usize,
    rate_interval: usize,
    pause_seconds: f64,
) -> Result<Duration, ConfigError> {
    if start_page < 1 {
        return Err(ConfigError::Validation(format!(
            "start_page must be >= 1, got {}",
            start_page
        )));
    }

    if max_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links must be >= 1, got {}",
            max_links
        )));
    }

    if rate_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "rate_interval must be >= 1, got {}",
            rate_interval
        )));
    }

    // Rejects negative, NaN and values too large for a Duration
    Duration::try_from_secs_f64(pause_seconds).map_err(|e| {
        ConfigError::Validation(format!(
            "pause_seconds must be a non-negative number of seconds, got {}: {}",
            pause_seconds, e
        ))
    })
}

/// Parses a CSS selector, reporting failures as configuration errors
pub fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.index_url.contains("{}") {
        return Err(ConfigError::Validation(format!(
            "index_url must contain a '{{}}' page placeholder, got '{}'",
            config.index_url
        )));
    }

    let sample = config.index_url.replace("{}", "1");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "index_url must use HTTP(S), got '{}'",
            url.scheme()
        )));
    }

    validate_crawl_bounds(
        config.start_page,
        config.max_links,
        config.rate_interval,
        config.pause_seconds,
    )?;

    if config.title_tag.trim().is_empty() {
        return Err(ConfigError::Validation(
            "title_tag cannot be empty".to_string(),
        ));
    }

    parse_selector(&config.link_selector)?;

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates corpus configuration
fn validate_corpus_config(config: &CorpusConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    // The prefix becomes part of every file name and every document id
    if config.prefix.is_empty()
        || !config
            .prefix
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "prefix must be non-empty and contain only alphanumerics, '_' or '-', got '{}'",
            config.prefix
        )));
    }

    if config.id_width < 1 || config.id_width > 12 {
        return Err(ConfigError::Validation(format!(
            "id_width must be between 1 and 12, got {}",
            config.id_width
        )));
    }

    for delimiter in &config.sentence_delimiters {
        if delimiter.is_empty() {
            return Err(ConfigError::Validation(
                "sentence delimiters cannot be empty strings".to_string(),
            ));
        }

        if config.delimiters_are_regex {
            Regex::new(delimiter).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid sentence delimiter pattern '{}': {}",
                    delimiter, e
                ))
            })?;
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
