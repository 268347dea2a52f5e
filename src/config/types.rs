use crate::corpus::KeepDelimiter;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for PTT-Corpus
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub cleaning: CleaningConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Path of the discovered-link list, defaulting into the corpus directory
    pub fn link_list_path(&self) -> PathBuf {
        self.output
            .link_list_path
            .clone()
            .unwrap_or_else(|| self.corpus.output_dir.join("links.txt"))
    }

    /// Path of the processed-link ledger, defaulting into the corpus directory
    pub fn processed_path(&self) -> PathBuf {
        self.output
            .processed_path
            .clone()
            .unwrap_or_else(|| self.corpus.output_dir.join("processed.txt"))
    }
}

/// Index crawl configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Index page URL with a `{}` placeholder for the page number
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Highest index page to visit; pages are walked down towards 1
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Stop once this many links have been collected
    #[serde(rename = "max-links")]
    pub max_links: usize,

    /// Pause after this many collected links
    #[serde(rename = "rate-interval")]
    pub rate_interval: usize,

    /// Length of each pause (seconds)
    #[serde(rename = "pause-seconds")]
    pub pause_seconds: f64,

    /// Bracketed category tag that accepted anchor texts must start with
    #[serde(rename = "title-tag", default = "default_title_tag")]
    pub title_tag: String,

    /// CSS selector for post anchors on an index page
    #[serde(rename = "link-selector", default = "default_link_selector")]
    pub link_selector: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Corpus encoding and layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// Directory receiving the `.vrt`/`.json` pairs
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// File name prefix, also the prefix of every document id
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Zero-padding width of the numeric part of a document id
    #[serde(rename = "id-width", default = "default_id_width")]
    pub id_width: usize,

    /// Sentence boundary patterns
    #[serde(rename = "sentence-delimiters", default = "default_sentence_delimiters")]
    pub sentence_delimiters: Vec<String>,

    /// Treat `sentence-delimiters` as regular expressions instead of literals
    #[serde(rename = "delimiters-are-regex", default = "default_true")]
    pub delimiters_are_regex: bool,

    /// Where a matched delimiter ends up
    #[serde(rename = "keep-delimiter", default)]
    pub keep_delimiter: KeepDelimiter,

    /// Value of the `source` attribute
    #[serde(default = "default_source")]
    pub source: String,

    /// Value of the `article_type` attribute
    #[serde(rename = "article-type", default = "default_article_type")]
    pub article_type: String,

    /// Optional word list; when set, only articles containing an entry are kept
    #[serde(rename = "lexicon-path", default)]
    pub lexicon_path: Option<PathBuf>,

    /// Also write the cleaned content as `<id>.txt`
    #[serde(rename = "write-plain-text", default)]
    pub write_plain_text: bool,
}

/// Content cleaning passes
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CleaningConfig {
    #[serde(rename = "strip-tags", default = "default_true")]
    pub strip_tags: bool,

    #[serde(rename = "strip-urls", default = "default_true")]
    pub strip_urls: bool,

    #[serde(rename = "decode-entities", default = "default_true")]
    pub decode_entities: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            strip_tags: true,
            strip_urls: true,
            decode_entities: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Newline-delimited list of discovered URLs
    #[serde(rename = "link-list-path", default)]
    pub link_list_path: Option<PathBuf>,

    /// Newline-delimited list of URLs already processed
    #[serde(rename = "processed-path", default)]
    pub processed_path: Option<PathBuf>,

    /// Write the log to this file instead of stderr
    #[serde(rename = "log-path", default)]
    pub log_path: Option<PathBuf>,
}

fn default_title_tag() -> String {
    "[新聞]".to_string()
}

fn default_link_selector() -> String {
    "div.title a".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_prefix() -> String {
    "PTT_News".to_string()
}

fn default_id_width() -> usize {
    5
}

fn default_sentence_delimiters() -> Vec<String> {
    vec!["。」?".to_string(), "？」?".to_string(), "！」?".to_string()]
}

fn default_source() -> String {
    "PTT".to_string()
}

fn default_article_type() -> String {
    "news".to_string()
}

fn default_true() -> bool {
    true
}
