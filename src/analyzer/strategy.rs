//! Analysis strategies
//!
//! Each strategy fills only the fields it owns in a fresh [`AnalyzeResult`]:
//!
//! | Strategy | Field |
//! |----------|-------|
//! | `HtmlVersionStrategy` | `html_version` |
//! | `TitleStrategy` | `title` |
//! | `HeadingsStrategy` | `headings` |
//! | `LinksStrategy` | `links` |
//! | `LoginFormStrategy` | `login_form` |

use crate::analyzer::facts::{count_headings, detect_html_version, extract_title, has_login_form};
use crate::analyzer::links::count_links;
use crate::analyzer::model::AnalyzeResult;
use crate::analyzer::prober::LinkProber;
use crate::document::Document;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// One independent analysis over a shared, read-only document
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short label used in logs and error messages
    fn name(&self) -> &'static str;

    /// Produces a partial result for this strategy's fields
    async fn analyze(
        &self,
        document: &Document,
        base_url: &Url,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResult>;
}

pub struct HtmlVersionStrategy;

#[async_trait]
impl Strategy for HtmlVersionStrategy {
    fn name(&self) -> &'static str {
        "html_version"
    }

    async fn analyze(
        &self,
        document: &Document,
        _base_url: &Url,
        _cancel: &CancellationToken,
    ) -> Result<AnalyzeResult> {
        Ok(AnalyzeResult {
            html_version: detect_html_version(document),
            ..Default::default()
        })
    }
}

pub struct TitleStrategy;

#[async_trait]
impl Strategy for TitleStrategy {
    fn name(&self) -> &'static str {
        "title"
    }

    async fn analyze(
        &self,
        document: &Document,
        _base_url: &Url,
        _cancel: &CancellationToken,
    ) -> Result<AnalyzeResult> {
        Ok(AnalyzeResult {
            title: extract_title(document),
            ..Default::default()
        })
    }
}

pub struct HeadingsStrategy;

#[async_trait]
impl Strategy for HeadingsStrategy {
    fn name(&self) -> &'static str {
        "headings"
    }

    async fn analyze(
        &self,
        document: &Document,
        _base_url: &Url,
        _cancel: &CancellationToken,
    ) -> Result<AnalyzeResult> {
        Ok(AnalyzeResult {
            headings: count_headings(document),
            ..Default::default()
        })
    }
}

/// Counts links and checks their reachability with an injected prober
pub struct LinksStrategy {
    prober: Arc<dyn LinkProber>,
    max_workers: usize,
}

impl LinksStrategy {
    pub fn new(prober: Arc<dyn LinkProber>, max_workers: usize) -> Self {
        Self {
            prober,
            max_workers,
        }
    }
}

#[async_trait]
impl Strategy for LinksStrategy {
    fn name(&self) -> &'static str {
        "links"
    }

    async fn analyze(
        &self,
        document: &Document,
        base_url: &Url,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResult> {
        let links = count_links(
            document,
            base_url,
            Arc::clone(&self.prober),
            self.max_workers,
            cancel,
        )
        .await?;

        Ok(AnalyzeResult {
            links,
            ..Default::default()
        })
    }
}

pub struct LoginFormStrategy;

#[async_trait]
impl Strategy for LoginFormStrategy {
    fn name(&self) -> &'static str {
        "login_form"
    }

    async fn analyze(
        &self,
        document: &Document,
        _base_url: &Url,
        _cancel: &CancellationToken,
    ) -> Result<AnalyzeResult> {
        Ok(AnalyzeResult {
            login_form: has_login_form(document),
            ..Default::default()
        })
    }
}

/// Builds the standard strategy set with the prober injected
pub fn default_strategies(prober: Arc<dyn LinkProber>, max_workers: usize) -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(HtmlVersionStrategy),
        Arc::new(TitleStrategy),
        Arc::new(HeadingsStrategy),
        Arc::new(LinksStrategy::new(prober, max_workers)),
        Arc::new(LoginFormStrategy),
    ]
}
