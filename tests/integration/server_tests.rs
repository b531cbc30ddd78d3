//! HTTP service tests
//!
//! Each test starts the service on an ephemeral port and talks to it with a
//! plain reqwest client. Target pages are served by wiremock.

use async_trait::async_trait;
use page_lens::analyzer::{build_http_client, LinkProber};
use page_lens::server::{router, AppState, ErrorResponse, HealthResponse};
use page_lens::{AnalyzeResult, Config, LinkStats};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_service(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn post_analyze(service: &str, body: &str) -> (StatusCode, String) {
    let response = reqwest::Client::new()
        .post(format!("{}/analyze", service))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let service = spawn_service(AppState::new(Config::default()).unwrap()).await;

    let response = reqwest::get(format!("{}/health", service)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: HealthResponse = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_analyze_returns_result() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<!DOCTYPE html><html><head><title>Served</title></head>
                    <body><h2>A</h2><a href="/ok">ok</a></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let service = spawn_service(AppState::new(Config::default()).unwrap()).await;
    let body = format!(r#"{{"url": "{}/"}}"#, mock_server.uri());
    let (status, text) = post_analyze(&service, &body).await;

    assert_eq!(status, StatusCode::OK, "{}", text);
    let result: AnalyzeResult = serde_json::from_str(&text).unwrap();
    assert_eq!(result.html_version, "HTML5");
    assert_eq!(result.title, "Served");
    assert_eq!(result.headings[1].count, 1);
    assert_eq!(
        result.links,
        LinkStats {
            internal: 1,
            external: 0,
            inaccessible: 0
        }
    );
}

/// Reports every link under `/gone` as unreachable
struct PathProber;

#[async_trait]
impl LinkProber for PathProber {
    async fn is_accessible(&self, url: &str) -> bool {
        !url.contains("/gone")
    }
}

#[tokio::test]
async fn test_analyze_uses_injected_prober() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <a href="/gone">1</a><a href="/gone">2</a>
                    <a href="/here">3</a><a href="https://other.example/">4</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let client = build_http_client(&config.fetcher).unwrap();
    let state = AppState::with_prober(config, client, Arc::new(PathProber));
    let service = spawn_service(state).await;

    let body = format!(r#"{{"url": "{}/"}}"#, mock_server.uri());
    let (status, text) = post_analyze(&service, &body).await;

    assert_eq!(status, StatusCode::OK, "{}", text);
    let result: AnalyzeResult = serde_json::from_str(&text).unwrap();
    assert_eq!(
        result.links,
        LinkStats {
            internal: 1,
            external: 1,
            inaccessible: 2
        }
    );
}

#[tokio::test]
async fn test_analyze_rejects_bad_requests() {
    let service = spawn_service(AppState::new(Config::default()).unwrap()).await;

    for body in ["not json", "{}", r#"{"url": ""}"#, r#"{"url": "ftp://example.com/"}"#] {
        let (status, text) = post_analyze(&service, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);

        let error: ErrorResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(error.status_code, 400);
        assert!(!error.error.is_empty());
    }
}

#[tokio::test]
async fn test_analyze_upstream_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let service = spawn_service(AppState::new(Config::default()).unwrap()).await;
    let body = format!(r#"{{"url": "{}/"}}"#, mock_server.uri());
    let (status, text) = post_analyze(&service, &body).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(error.status_code, 502);
    assert!(error.error.contains("503"), "{}", error.error);
}

#[tokio::test]
async fn test_analyze_requires_post() {
    let service = spawn_service(AppState::new(Config::default()).unwrap()).await;

    let response = reqwest::get(format!("{}/analyze", service)).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
