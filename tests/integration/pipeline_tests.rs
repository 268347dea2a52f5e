//! Integration tests for full runs
//!
//! A wiremock server plays the board: index pages plus article pages. The
//! runs write into a temporary corpus directory.

use ptt_corpus::config::{parse_config, Config};
use ptt_corpus::corpus::{Segmenter, Token};
use ptt_corpus::crawler::HttpFetcher;
use ptt_corpus::pipeline::{run, RunMode};
use ptt_corpus::EncodeError;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One token per character, tagged by character class
struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment(&self, text: &str, tagged: bool) -> Result<Vec<Token>, EncodeError> {
        Ok(text
            .split_whitespace()
            .flat_map(|word| word.chars())
            .map(|c| {
                let tag = match (tagged, c.is_alphanumeric()) {
                    (false, _) => "",
                    (true, true) => "n",
                    (true, false) => "w",
                };
                Token::new(c.to_string(), tag)
            })
            .collect())
    }
}

fn segmenter() -> Box<dyn Segmenter> {
    Box::new(CharSegmenter)
}

fn config(server: &MockServer, dir: &Path, extra: &str) -> Config {
    parse_config(&format!(
        r#"
[crawler]
index-url = "{uri}/bbs/Test/index{{}}.html"
start-page = 2
max-links = 10
rate-interval = 2
pause-seconds = 0.0
timeout-seconds = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[corpus]
output-dir = "{dir}"
sentence-delimiters = ["。"]
delimiters-are-regex = false
{extra}
"#,
        uri = server.uri(),
        dir = dir.join("corpus").display(),
        extra = extra,
    ))
    .expect("Test config should be valid")
}

fn fetcher() -> Arc<HttpFetcher> {
    Arc::new(
        HttpFetcher::from_config(&ptt_corpus::config::UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        }, Duration::from_secs(5))
        .expect("Failed to build client"),
    )
}

fn post(title: &str, body: &str) -> String {
    format!(
        concat!(
            r#"<html><body><div id="main-content" class="bbs-screen bbs-content">"#,
            r#"<div class="article-metaline"><span class="article-meta-tag">作者</span><span class="article-meta-value">reporter (記者)</span></div>"#,
            r#"<div class="article-metaline-right"><span class="article-meta-tag">看板</span><span class="article-meta-value">Test</span></div>"#,
            r#"<div class="article-metaline"><span class="article-meta-tag">標題</span><span class="article-meta-value">{}</span></div>"#,
            r#"<div class="article-metaline"><span class="article-meta-tag">時間</span><span class="article-meta-value">Tue Mar  8 10:15:23 2016</span></div>"#,
            "\n{}\n\n--\n<span class=\"f2\">※ 發信站: 批踢踢實業坊(ptt.cc), 來自: 1.2.3.4\n</span></div></body></html>"
        ),
        title, body
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Index page 2 lists M.1, index page 1 lists M.2 and M.3
async fn mount_board(server: &MockServer) {
    mount_page(
        server,
        "/bbs/Test/index2.html",
        r#"<html><body><div class="title"><a href="/bbs/Test/M.1.html">[新聞] 颱風</a></div>
           <div class="title"><a href="/bbs/Test/M.9.html">[問卦] 閒聊</a></div></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        server,
        "/bbs/Test/index1.html",
        r#"<html><body><div class="title"><a href="/bbs/Test/M.2.html">[新聞] 地震</a></div>
           <div class="title"><a href="/bbs/Test/M.3.html">[新聞] 空白</a></div></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/bbs/Test/M.1.html",
        post(
            "[新聞] 颱風",
            "1.媒體來源:\n中央社\n\n2.完整新聞標題:\n颱風來了\n\n3.完整新聞內文:\n颱風來了。停班停課。\n\n4.完整新聞連結 (或短網址):\n<a href=\"https://cna.example/news/1\" target=\"_blank\">https://cna.example/news/1</a>\n\n5.備註:\n",
        ),
    )
    .await;
    mount_page(server, "/bbs/Test/M.2.html", post("[新聞] 地震", "地震。"))
        .await;
    mount_page(server, "/bbs/Test/M.3.html", post("[新聞] 空白", "   ")).await;
}

fn corpus_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.join("corpus"))
        .expect("Corpus directory should exist")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_run_writes_corpus() {
    let mock_server = MockServer::start().await;
    mount_board(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server, dir.path(), "");

    let stats = run(
        &config,
        RunMode::Full,
        fetcher(),
        Arc::new(AtomicBool::new(false)),
        segmenter,
    )
    .await
    .expect("Run should succeed");

    assert_eq!(stats.discovered, 3);
    assert_eq!(stats.written, 3);
    assert_eq!(stats.failures(), 0);

    // Links are processed in sorted order: M.1, M.2, M.3
    assert_eq!(
        corpus_files(dir.path()),
        vec![
            "PTT_News00001.json",
            "PTT_News00001.vrt",
            "PTT_News00002.json",
            "PTT_News00002.vrt",
            "PTT_News00003.vrt",
            "links.txt",
            "processed.txt",
        ]
    );

    let first = fs::read_to_string(dir.path().join("corpus/PTT_News00001.vrt")).unwrap();
    let expected_header = format!(
        concat!(
            r#"<text author="reporter" board="Test" title="[新聞] 颱風" date="2016-03-08" "#,
            r#"source="PTT" article_type="news" origin_url="{}/bbs/Test/M.1.html" "#,
            r#"media="中央社" news_title="颱風來了" news_url="https://cna.example/news/1" note="" "#,
            r#"id="PTT_News00001">"#
        ),
        mock_server.uri()
    );
    assert!(first.starts_with(&expected_header), "header was: {}", first.lines().next().unwrap());
    assert!(first.contains("<s>\n颱\tn\n風\tn\n來\tn\n了\tn\n。\tw\n</s>\n<s>\n停\tn\n"));
    assert!(first.ends_with("</p>\n</text>"));

    let summary: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("corpus/PTT_News00002.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["token"], 3);
    assert_eq!(summary["type"], 3);
    assert_eq!(summary["wortfreq"][0][0], "地");
}

#[tokio::test]
async fn test_second_run_skips_processed_links() {
    let mock_server = MockServer::start().await;
    mount_board(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server, dir.path(), "");

    run(&config, RunMode::Full, fetcher(), Arc::new(AtomicBool::new(false)), segmenter)
        .await
        .unwrap();
    let stats = run(&config, RunMode::Full, fetcher(), Arc::new(AtomicBool::new(false)), segmenter)
        .await
        .unwrap();

    assert_eq!(stats.already_processed, 3);
    assert_eq!(stats.written, 0);
    assert!(!dir.path().join("corpus/PTT_News00004.vrt").exists());
}

#[tokio::test]
async fn test_links_only_then_resume() {
    let mock_server = MockServer::start().await;
    mount_board(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server, dir.path(), "");

    let stats = run(
        &config,
        RunMode::LinksOnly,
        fetcher(),
        Arc::new(AtomicBool::new(false)),
        segmenter,
    )
    .await
    .unwrap();

    assert_eq!(stats.discovered, 3);
    assert_eq!(stats.written, 0);
    let list = fs::read_to_string(dir.path().join("corpus/links.txt")).unwrap();
    assert_eq!(list.lines().count(), 3);
    assert!(!dir.path().join("corpus/PTT_News00001.vrt").exists());

    let stats = run(
        &config,
        RunMode::NoCrawl,
        fetcher(),
        Arc::new(AtomicBool::new(false)),
        segmenter,
    )
    .await
    .unwrap();

    assert_eq!(stats.written, 3);
    assert!(dir.path().join("corpus/PTT_News00003.vrt").exists());
}

#[tokio::test]
async fn test_lexicon_and_plain_text() {
    let mock_server = MockServer::start().await;
    mount_board(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lexicon.txt"), "地震\n\n").unwrap();

    let extra = format!(
        "lexicon-path = \"{}\"\nwrite-plain-text = true\nprefix = \"Quake\"\nid-width = 3",
        dir.path().join("lexicon.txt").display()
    );
    let config = config(&mock_server, dir.path(), &extra);

    let stats = run(&config, RunMode::Full, fetcher(), Arc::new(AtomicBool::new(false)), segmenter)
        .await
        .unwrap();

    assert_eq!(stats.written, 1);
    assert_eq!(stats.no_lexicon_match, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("corpus/Quake001.txt")).unwrap(),
        "地震。"
    );
    assert!(fs::read_to_string(dir.path().join("corpus/Quake001.vrt"))
        .unwrap()
        .contains(r#"title="[新聞] 地震""#));
}

#[tokio::test]
async fn test_failed_article_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/bbs/Test/index1.html",
        r#"<html><body><div class="title"><a href="/bbs/Test/M.1.html">[新聞] 壞掉</a></div></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Test/M.1.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&mock_server, dir.path(), "");
    config.crawler.start_page = 1;

    let stats = run(&config, RunMode::Full, fetcher(), Arc::new(AtomicBool::new(false)), segmenter)
        .await
        .unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.written, 0);
    assert_eq!(corpus_files(dir.path()), vec!["links.txt"]);
}
