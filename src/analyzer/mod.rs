//! Page analysis pipeline
//!
//! This module contains the core analysis logic, including:
//! - HTTP fetching of the target page
//! - Single-fact extractors (markup version, title, headings, login form)
//! - Link resolution with a bounded reachability pool
//! - Concurrent strategy fan-out and result merging

mod coordinator;
mod facts;
mod fetcher;
mod links;
mod model;
mod prober;
mod strategy;

pub use coordinator::run_strategies;
pub use facts::{
    count_headings, detect_html_version, extract_title, has_login_form, HTML5, UNKNOWN_DOCTYPE,
    UNKNOWN_VERSION,
};
pub use fetcher::{build_http_client, fetch_document, fetch_page, FetchedPage};
pub use links::{collect_links, count_links, LinkRecord};
pub use model::{AnalyzeResult, HeadingCount, LinkStats};
pub use prober::{HttpProber, LinkProber};
pub use strategy::{
    default_strategies, HeadingsStrategy, HtmlVersionStrategy, LinksStrategy, LoginFormStrategy,
    Strategy, TitleStrategy,
};

use crate::config::Config;
use crate::{AnalyzerError, Result};
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Analyzes a single page
///
/// This is the main entry point. It will:
/// 1. Validate the target URL
/// 2. Build the HTTP client
/// 3. Fetch and parse the page
/// 4. Run every strategy concurrently and merge the results
///
/// The whole operation is bounded by `config.analysis.timeout_secs`.
///
/// # Example
///
/// ```no_run
/// use page_lens::{analyze_page, Config};
///
/// # async fn run() -> page_lens::Result<()> {
/// let result = analyze_page("https://example.com", &Config::default()).await?;
/// println!("{} has {} external links", result.title, result.links.external);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_page(target: &str, config: &Config) -> Result<AnalyzeResult> {
    let client = build_http_client(&config.fetcher)?;
    let prober = Arc::new(HttpProber::new(client.clone(), config.prober.timeout()));
    analyze_page_with(target, config, &client, prober).await
}

/// Analyzes a single page with an explicit client and prober
pub async fn analyze_page_with(
    target: &str,
    config: &Config,
    client: &Client,
    prober: Arc<dyn LinkProber>,
) -> Result<AnalyzeResult> {
    tracing::info!(url = target, "analyze.start");

    let target_url = parse_target_url(target)?;
    let cancel = CancellationToken::new();

    let analysis = async {
        let (document, base_url) = fetch_document(client, &target_url).await?;
        let strategies = default_strategies(prober, config.prober.max_workers);
        run_strategies(Arc::new(document), Arc::new(base_url), strategies, &cancel).await
    };

    let result = match tokio::time::timeout(config.analysis.timeout(), analysis).await {
        Ok(result) => result?,
        Err(_) => {
            cancel.cancel();
            tracing::error!(url = target, "analyze.timeout");
            return Err(AnalyzerError::Timeout {
                url: target.to_string(),
            });
        }
    };

    tracing::info!(
        html_version = %result.html_version,
        title = %result.title,
        login_form = result.login_form,
        links_internal = result.links.internal,
        links_external = result.links.external,
        links_inaccessible = result.links.inaccessible,
        "analyze.done"
    );
    Ok(result)
}

/// Validates that the target is an absolute http(s) URL with a host
pub fn parse_target_url(target: &str) -> Result<Url> {
    let parsed = Url::parse(target.trim()).map_err(|e| {
        tracing::info!(url = target, "analyze.invalid_url");
        AnalyzerError::InvalidUrl(format!("{}: {}", target, e))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        tracing::info!(url = target, "analyze.invalid_url");
        return Err(AnalyzerError::InvalidUrl(format!(
            "{}: only http and https URLs can be analyzed",
            target
        )));
    }

    tracing::debug!(host = parsed.host_str().unwrap_or_default(), "analyze.url_parsed");
    Ok(parsed)
}
