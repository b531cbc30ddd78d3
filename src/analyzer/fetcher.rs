//! HTTP fetcher implementation
//!
//! This module retrieves the page under analysis:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests following a bounded number of redirects
//! - Error classification (timeout, unreachable, upstream status)
//!
//! No retries are attempted.

use crate::config::FetcherConfig;
use crate::document::Document;
use crate::{AnalyzerError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use url::Url;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: String,
    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use page_lens::analyzer::build_http_client;
/// use page_lens::config::FetcherConfig;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a GET request
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `Timeout` |
/// | Connection or transport failure | `Unreachable` |
/// | Status outside 200-399 | `Upstream` |
/// | Body cannot be read | `Unreachable` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    tracing::info!(url = %url, "http.fetch");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    tracing::info!(status = status.as_u16(), "http.response");

    if !(status.is_success() || status.is_redirection()) {
        tracing::error!(url = %url, status = status.as_u16(), "http.non_2xx");
        return Err(AnalyzerError::Upstream {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Fetches a page and parses it into a [`Document`]
///
/// Returns the document together with the final URL, which serves as the
/// base for resolving and classifying links.
pub async fn fetch_document(client: &Client, url: &Url) -> Result<(Document, Url)> {
    let page = fetch_page(client, url).await?;
    if !page.content_type.is_empty() && !page.content_type.contains("html") {
        tracing::warn!(content_type = %page.content_type, "http.unexpected_content_type");
    }

    tracing::info!(bytes = page.body.len(), "html.parse.start");
    let body = page.body;
    let document = tokio::task::spawn_blocking(move || Document::parse(&body))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "html.parse.error");
            AnalyzerError::HtmlParse(e.to_string())
        })?;
    tracing::info!(nodes = document.node_count(), "html.parse.ok");

    Ok((document, page.final_url))
}

fn classify_error(url: &Url, error: reqwest::Error) -> AnalyzerError {
    if error.is_timeout() {
        tracing::error!(url = %url, "http.timeout");
        AnalyzerError::Timeout {
            url: url.to_string(),
        }
    } else {
        tracing::error!(url = %url, error = %error, "http.error");
        AnalyzerError::Unreachable {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
