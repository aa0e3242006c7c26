use crate::{Keyword, Page};

/// Side-channel hook called while a page is scored.
///
/// Implementations only report; they never influence the score.
pub trait ScoreObserver {
    fn keyword_counted(&self, _page: &Page, _keyword: &Keyword, _count: usize) {}
    fn page_scored(&self, _page: &Page, _score: f64) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScoreObserver for NoopObserver {}

/// Reports counts and scores as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScoreObserver for TracingObserver {
    fn keyword_counted(&self, page: &Page, keyword: &Keyword, count: usize) {
        if count > 0 {
            tracing::debug!(url = page.url(), term = keyword.term(), weight = keyword.weight(), count, "keyword counted");
        }
    }

    fn page_scored(&self, page: &Page, score: f64) {
        tracing::info!(url = page.url(), name = page.name(), score, "page scored");
    }
}
