use crate::seeds::Target;
use anyhow::Result;
use scoring::{FetchContent, KeywordCatalog, Page, ScoreError, TracingObserver};
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum pages fetched at once.
    pub concurrency: usize,
    /// Abort on the first failed fetch instead of skipping the page.
    ///
    /// No new targets are started after the failure; fetches already in
    /// flight are waited for before the error is returned.
    pub fail_fast: bool,
}

impl Default for RunOptions {
    fn default() -> Self { Self { concurrency: 8, fail_fast: false } }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct Outcome {
    /// Scored pages, in target order.
    pub pages: Vec<Page>,
    pub failures: Vec<Failure>,
}

/// Fetch and score every target, each on its own blocking worker.
///
/// A failed fetch drops that target from `pages`. With `fail_fast` the first
/// failure is returned as the error instead.
pub async fn score_targets<F>(
    targets: Vec<Target>,
    fetcher: Arc<F>,
    catalog: Arc<KeywordCatalog>,
    opts: &RunOptions,
) -> Result<Outcome>
where
    F: FetchContent + Send + Sync + 'static,
{
    let total = targets.len();
    let concurrency = opts.concurrency.max(1);
    let mut slots: Vec<Option<Page>> = vec![None; total];
    let mut failures = Vec::new();
    let mut set: JoinSet<(usize, Result<Page, ScoreError>)> = JoinSet::new();
    let mut pending = targets.into_iter().enumerate();

    loop {
        // Fill workers
        while set.len() < concurrency {
            let Some((idx, target)) = pending.next() else { break };
            let fetcher = fetcher.clone();
            let catalog = catalog.clone();
            set.spawn_blocking(move || {
                let res = Page::fetch(target.url, target.name, &*fetcher).map(|mut page| {
                    page.compute_score_with(&catalog, &TracingObserver);
                    page
                });
                (idx, res)
            });
        }

        let Some(joined) = set.join_next().await else { break };
        let (idx, res) = joined?;
        match res {
            Ok(page) => slots[idx] = Some(page),
            Err(err) => {
                if opts.fail_fast {
                    // Blocking workers can't be cancelled, so let them finish.
                    while set.join_next().await.is_some() {}
                    return Err(err.into());
                }
                tracing::warn!(error = %err, "skipping page");
                failures.push(Failure {
                    url: err.url().unwrap_or_default().to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    let pages: Vec<Page> = slots.into_iter().flatten().collect();
    tracing::info!(targets = total, scored = pages.len(), failed = failures.len(), "scoring complete");
    Ok(Outcome { pages, failures })
}
