//! Link resolution and the bounded reachability pool
//!
//! Links are gathered in one document-order pass, deduplicated by their
//! absolute form and then probed by a fixed number of workers. Every unique
//! URL is probed exactly once; its verdict applies to all of its occurrences.

use crate::analyzer::model::LinkStats;
use crate::analyzer::prober::LinkProber;
use crate::document::Document;
use crate::{AnalyzerError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Attributes that carry a link, in lookup order
const LINK_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// A unique absolute link and how often it appears
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub url: String,
    pub is_internal: bool,
    pub occurrences: usize,
}

/// Collects unique absolute http(s) links from the document
///
/// Each element contributes at most one link: its `href`, or its `src` when
/// it has no `href`. Records are returned in order of first appearance.
pub fn collect_links(document: &Document, base_url: &Url) -> Vec<LinkRecord> {
    let mut records: Vec<LinkRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for node in document.descendants() {
        let Some(raw) = LINK_ATTRIBUTES.iter().find_map(|key| node.attr(key)) else {
            continue;
        };
        let Some(absolute) = resolve_link(raw, base_url) else {
            continue;
        };

        let key = absolute.to_string();
        match index.get(&key) {
            Some(&position) => records[position].occurrences += 1,
            None => {
                index.insert(key.clone(), records.len());
                records.push(LinkRecord {
                    url: key,
                    is_internal: is_same_host(&absolute, base_url),
                    occurrences: 1,
                });
            }
        }
    }

    records
}

/// Resolves a raw attribute value to an absolute http(s) URL
///
/// Returns None for empty values, unparseable values, `javascript:` and
/// `mailto:` links, and anything that is not http(s) after resolution.
fn resolve_link(raw: &str, base_url: &Url) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }

    let absolute = match Url::parse(raw) {
        Ok(url) => {
            if matches!(url.scheme(), "javascript" | "mailto") {
                return None;
            }
            url
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => base_url.join(raw).ok()?,
        Err(_) => return None,
    };

    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}

/// Compares hosts plus any explicit port; `Url` drops a scheme's default port
fn is_same_host(url: &Url, base_url: &Url) -> bool {
    url.host_str() == base_url.host_str() && url.port() == base_url.port()
}

/// Counts internal, external and inaccessible links by occurrence
///
/// At most `max_workers` probes run at once. The pool drains completely
/// before aggregation. If `cancel` fires, workers stop taking new links and
/// the call returns [`AnalyzerError::Cancelled`].
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `base_url` - The page URL, used to resolve and classify links
/// * `prober` - The reachability check
/// * `max_workers` - Upper bound on concurrent probes
/// * `cancel` - Cooperative cancellation signal
pub async fn count_links(
    document: &Document,
    base_url: &Url,
    prober: Arc<dyn LinkProber>,
    max_workers: usize,
    cancel: &CancellationToken,
) -> Result<LinkStats> {
    let records = collect_links(document, base_url);
    if records.is_empty() {
        tracing::debug!("links.none");
        return Ok(LinkStats::default());
    }

    let worker_count = max_workers.clamp(1, records.len());
    tracing::debug!(
        unique = records.len(),
        workers = worker_count,
        "links.probe.start"
    );

    let queue: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(
        records.iter().map(|record| record.url.clone()).collect(),
    ));
    let verdicts: Arc<Mutex<HashMap<String, bool>>> =
        Arc::new(Mutex::new(HashMap::with_capacity(records.len())));

    let mut pool = JoinSet::new();
    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let verdicts = Arc::clone(&verdicts);
        let prober = Arc::clone(&prober);
        let cancel = cancel.clone();

        pool.spawn(async move {
            while !cancel.is_cancelled() {
                let next = queue.lock().unwrap().pop_front();
                let Some(url) = next else {
                    break;
                };
                let accessible = prober.is_accessible(&url).await;
                verdicts.lock().unwrap().insert(url, accessible);
            }
        });
    }

    while let Some(joined) = pool.join_next().await {
        joined?;
    }

    if cancel.is_cancelled() {
        tracing::debug!("links.probe.cancelled");
        return Err(AnalyzerError::Cancelled);
    }

    let verdicts = verdicts.lock().unwrap();
    let stats = aggregate(&records, &verdicts);
    tracing::debug!(
        internal = stats.internal,
        external = stats.external,
        inaccessible = stats.inaccessible,
        "links.probe.done"
    );
    Ok(stats)
}

fn aggregate(records: &[LinkRecord], verdicts: &HashMap<String, bool>) -> LinkStats {
    let mut stats = LinkStats::default();
    for record in records {
        if !verdicts.get(&record.url).copied().unwrap_or(false) {
            stats.inaccessible += record.occurrences;
        } else if record.is_internal {
            stats.internal += record.occurrences;
        } else {
            stats.external += record.occurrences;
        }
    }
    stats
}
