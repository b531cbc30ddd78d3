//! Strategy fan-out and merge
//!
//! Every strategy runs as its own task against the same shared document.
//! Partial results are merged into one accumulator under a lock that is held
//! only for the merge itself. The first failure cancels the shared token;
//! the coordinator still joins every task and then reports that failure.

use crate::analyzer::model::AnalyzeResult;
use crate::analyzer::strategy::Strategy;
use crate::document::Document;
use crate::{AnalyzerError, Result};
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Runs all strategies concurrently and merges their results
///
/// # Arguments
///
/// * `document` - The parsed page, shared read-only by every task
/// * `base_url` - The page URL
/// * `strategies` - The strategies to run; order carries no meaning
/// * `cancel` - Parent cancellation signal; cancelling it stops all units
///
/// # Returns
///
/// * `Ok(AnalyzeResult)` - Every strategy succeeded
/// * `Err(AnalyzerError::Strategy)` - The first strategy failure, naming the strategy
/// * `Err(AnalyzerError::Join)` - A strategy task panicked
pub async fn run_strategies(
    document: Arc<Document>,
    base_url: Arc<Url>,
    strategies: Vec<Arc<dyn Strategy>>,
    cancel: &CancellationToken,
) -> Result<AnalyzeResult> {
    let accumulator = Arc::new(Mutex::new(AnalyzeResult::default()));
    let token = cancel.child_token();

    tracing::info!(count = strategies.len(), "strategies.start");

    let mut tasks = JoinSet::new();
    for strategy in strategies {
        let document = Arc::clone(&document);
        let base_url = Arc::clone(&base_url);
        let accumulator = Arc::clone(&accumulator);
        let token = token.clone();

        tasks.spawn(async move {
            let name = strategy.name();
            if token.is_cancelled() {
                return Err((name, AnalyzerError::Cancelled));
            }

            tracing::debug!(strategy = name, "strategy.start");
            let partial = match strategy.analyze(&document, &base_url, &token).await {
                Ok(partial) => partial,
                Err(e) => {
                    tracing::error!(strategy = name, error = %e, "strategy.error");
                    token.cancel();
                    return Err((name, e));
                }
            };

            tracing::debug!(
                strategy = name,
                html_version = %partial.html_version,
                title = %partial.title,
                login_form = partial.login_form,
                links_internal = partial.links.internal,
                links_external = partial.links.external,
                links_inaccessible = partial.links.inaccessible,
                "strategy.done"
            );
            accumulator.lock().unwrap().merge(partial);
            Ok(())
        });
    }

    let mut first_error: Option<AnalyzerError> = None;
    while let Some(joined) = tasks.join_next().await {
        let error = match joined {
            Ok(Ok(())) => continue,
            Ok(Err((name, source))) => AnalyzerError::Strategy {
                strategy: name.to_string(),
                source: Box::new(source),
            },
            Err(e) => {
                token.cancel();
                AnalyzerError::Join(e)
            }
        };

        // A cancellation is only a symptom; keep looking for the real cause
        let replace = match &first_error {
            None => true,
            Some(existing) => is_cancellation(existing) && !is_cancellation(&error),
        };
        if replace {
            first_error = Some(error);
        }
    }

    if let Some(error) = first_error {
        tracing::error!(error = %error, "strategies.failed");
        return Err(error);
    }

    tracing::info!("strategies.done");
    let result = match Arc::try_unwrap(accumulator) {
        Ok(mutex) => mutex.into_inner().unwrap(),
        Err(shared) => shared.lock().unwrap().clone(),
    };
    Ok(result)
}

fn is_cancellation(error: &AnalyzerError) -> bool {
    match error {
        AnalyzerError::Cancelled => true,
        AnalyzerError::Strategy { source, .. } => is_cancellation(source),
        _ => false,
    }
}
