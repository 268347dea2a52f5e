//! Integration tests for the crawler
//!
//! These tests use wiremock to serve index pages and check the HTTP fetcher
//! and the index walk end-to-end.

use ptt_corpus::config::UserAgentConfig;
use ptt_corpus::crawler::{HttpFetcher, LinkCrawler, PageSource};
use ptt_corpus::FetchError;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn fetcher(timeout: Duration) -> HttpFetcher {
    HttpFetcher::from_config(&user_agent(), timeout).expect("Failed to build client")
}

/// An index page with the given (title, href) anchors
fn index_page(entries: &[(&str, &str)]) -> String {
    let mut html = String::from(r#"<html><body><div class="r-list-container">"#);
    for (title, href) in entries {
        html.push_str(&format!(
            r#"<div class="r-ent"><div class="title"><a href="{}">{}</a></div></div>"#,
            href, title
        ));
    }
    html.push_str(r#"<div class="r-ent"><div class="title">(本文已被刪除) [someone]</div></div>"#);
    html.push_str("</div></body></html>");
    html
}

async fn mount_index(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/bbs/Test/index{}.html", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn crawler(server: &MockServer) -> LinkCrawler {
    LinkCrawler::new(
        Arc::new(fetcher(Duration::from_secs(5))),
        format!("{}/bbs/Test/index{{}}.html", server.uri()),
        "[新聞]",
        "div.title a",
    )
    .expect("Failed to build crawler")
}

#[tokio::test]
async fn test_fetch_sends_identity_and_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bbs/Test/M.1.html"))
        .and(header("cookie", "over18=1"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = fetcher(Duration::from_secs(5))
        .fetch(&format!("{}/bbs/Test/M.1.html", mock_server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetch_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = fetcher(Duration::from_secs(5))
        .fetch(&format!("{}/gone", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let result = fetcher(Duration::from_secs(1))
        .fetch(&format!("{}/slow", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_crawl_walks_pages_downward() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        3,
        index_page(&[
            ("[新聞] 三之一", "/bbs/Test/M.31.html"),
            ("[問卦] 閒聊", "/bbs/Test/M.32.html"),
            ("Re: [新聞] 三之一", "/bbs/Test/M.33.html"),
        ]),
    )
    .await;
    mount_index(
        &mock_server,
        2,
        index_page(&[
            ("[新聞] 二之一", "/bbs/Test/M.21.html"),
            ("[新聞] 三之一", "/bbs/Test/M.31.html"),
        ]),
    )
    .await;
    mount_index(
        &mock_server,
        1,
        index_page(&[("[新聞] 一之一", "/bbs/Test/M.11.html")]),
    )
    .await;

    let links = crawler(&mock_server)
        .crawl(3, 100, 10, 0.0)
        .await
        .expect("Crawl should succeed");

    let base = mock_server.uri();
    let expected: Vec<String> = ["M.11", "M.21", "M.31"]
        .iter()
        .map(|id| format!("{}/bbs/Test/{}.html", base, id))
        .collect();
    assert_eq!(links.iter().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_crawl_skips_failing_index_page() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        2,
        index_page(&[("[新聞] 二之一", "/bbs/Test/M.21.html")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Test/index1.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let links = crawler(&mock_server)
        .crawl(2, 100, 10, 0.0)
        .await
        .expect("A failed page should not fail the crawl");

    assert_eq!(links.len(), 1);
    assert!(links.contains(&format!("{}/bbs/Test/M.21.html", mock_server.uri())));
}

#[tokio::test]
async fn test_crawl_stops_at_max_links() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        2,
        index_page(&[
            ("[新聞] a", "/bbs/Test/M.a.html"),
            ("[新聞] b", "/bbs/Test/M.b.html"),
            ("[新聞] c", "/bbs/Test/M.c.html"),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Test/index1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let links = crawler(&mock_server)
        .crawl(2, 2, 10, 0.0)
        .await
        .expect("Crawl should succeed");

    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn test_crawl_rejects_bad_bounds_without_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = crawler(&mock_server).crawl(3, 0, 10, 0.0).await;
    assert!(matches!(result, Err(ptt_corpus::CorpusError::Config(_))));
}
