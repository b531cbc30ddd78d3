//! End-to-end analysis tests
//!
//! These tests use wiremock to serve pages and link targets, and run the
//! full fetch, parse, fan-out and merge cycle.

use async_trait::async_trait;
use page_lens::analyzer::{analyze_page, analyze_page_with, build_http_client, LinkProber};
use page_lens::{AnalyzerError, Config, LinkStats};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Records each probed URL and answers from a fixed table
#[derive(Default)]
struct RecordingProber {
    calls: Mutex<HashMap<String, usize>>,
    broken: Vec<String>,
}

#[async_trait]
impl LinkProber for RecordingProber {
    async fn is_accessible(&self, url: &str) -> bool {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;
        !self.broken.iter().any(|b| b == url)
    }
}

#[tokio::test]
async fn test_full_analysis_single_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(format!(
            r#"<!DOCTYPE html>
            <html><head><title>Home</title></head>
            <body>
              <h1>Home</h1>
              <h2>Section</h2>
              <div role="heading" aria-level="3">Aria</div>
              <a href="/page1">Page 1</a>
              <a href="{base}/page1">Page 1 again</a>
              <a href="/missing">Missing</a>
              <a href="mailto:someone@example.com">Mail</a>
              <form action="/login"><input type="Password" name="p"></form>
            </body></html>"#,
            base = base_url
        )))
        .mount(&mock_server)
        .await;

    // Link targets: page1 answers HEAD, /missing does not exist
    Mock::given(method("HEAD"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = analyze_page(&format!("{}/", base_url), &Config::default())
        .await
        .expect("analysis should succeed");

    assert_eq!(result.html_version, "HTML5");
    assert_eq!(result.title, "Home");
    let counts: Vec<usize> = result.headings.iter().map(|h| h.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 0, 0, 0]);
    assert_eq!(
        result.links,
        LinkStats {
            internal: 2,
            external: 0,
            inaccessible: 1
        }
    );
    assert!(result.login_form);
}

#[tokio::test]
async fn test_injected_prober_sees_each_unique_link_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><head><title>Links</title></head><body>
               <a href="https://external.test/a">a</a>
               <a href="https://external.test/a">a</a>
               <a href="https://external.test/a">a</a>
               <a href="https://external.test/dead">dead</a>
               <a href="https://external.test/dead">dead</a>
               <img src="/logo.png">
               </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let prober = Arc::new(RecordingProber {
        broken: vec!["https://external.test/dead".to_string()],
        ..Default::default()
    });
    let config = Config::default();
    let client = build_http_client(&config.fetcher).unwrap();

    let result = analyze_page_with(
        &format!("{}/", mock_server.uri()),
        &config,
        &client,
        Arc::clone(&prober) as Arc<dyn LinkProber>,
    )
    .await
    .unwrap();

    assert_eq!(
        result.links,
        LinkStats {
            internal: 1,
            external: 3,
            inaccessible: 2
        }
    );

    let calls = prober.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls.values().all(|&n| n == 1));
}

#[tokio::test]
async fn test_page_without_links_or_doctype() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_response("<p>plain</p>".to_string()))
        .mount(&mock_server)
        .await;

    let prober = Arc::new(RecordingProber::default());
    let config = Config::default();
    let client = build_http_client(&config.fetcher).unwrap();

    let result = analyze_page_with(
        &mock_server.uri(),
        &config,
        &client,
        Arc::clone(&prober) as Arc<dyn LinkProber>,
    )
    .await
    .unwrap();

    assert_eq!(result.html_version, "Unknown");
    assert_eq!(result.title, "");
    assert_eq!(result.headings.len(), 6);
    assert_eq!(result.links, LinkStats::default());
    assert!(!result.login_form);
    assert!(prober.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = analyze_page(&mock_server.uri(), &Config::default()).await;

    match result {
        Err(AnalyzerError::Upstream { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_scheme_is_client_error() {
    let result = analyze_page("ftp://example.com/file", &Config::default()).await;

    let error = result.unwrap_err();
    assert!(matches!(error, AnalyzerError::InvalidUrl(_)));
    assert!(error.is_client_error());
}

#[tokio::test]
async fn test_overall_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_response("<html></html>".to_string()).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.analysis.timeout_secs = 1;

    let result = analyze_page(&mock_server.uri(), &config).await;

    assert!(matches!(result, Err(AnalyzerError::Timeout { .. })));
}
