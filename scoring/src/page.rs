use crate::observe::{NoopObserver, ScoreObserver};
use crate::{Keyword, KeywordCatalog, OccurrenceCounter, ScoreError, Weight};
use serde::Serialize;

/// Something that can turn a URL into text content.
///
/// Closures `Fn(&str) -> anyhow::Result<String>` implement it directly, and
/// [`Page::fetch`] also accepts `&dyn FetchContent`.
pub trait FetchContent {
    fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

impl<F> FetchContent for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn fetch(&self, url: &str) -> anyhow::Result<String> { self(url) }
}

/// Occurrences of one catalog keyword in a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub term: String,
    pub weight: Weight,
    pub count: usize,
}

/// A fetched web resource and its keyword score.
#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    name: String,
    counter: OccurrenceCounter,
    score: Option<f64>,
}

impl Page {
    /// Fetch `url` once and bind the content to a new page.
    ///
    /// On failure no page is produced; the error carries the URL.
    pub fn fetch<F>(url: impl Into<String>, name: impl Into<String>, fetcher: &F) -> Result<Self, ScoreError>
    where
        F: FetchContent + ?Sized,
    {
        let url = url.into();
        let content = match fetcher.fetch(&url) {
            Ok(c) => c,
            Err(source) => return Err(ScoreError::FetchFailed { url, source }),
        };
        tracing::debug!(url = %url, bytes = content.len(), "fetched content");
        Ok(Self::from_content(url, name, content))
    }

    pub fn from_content(url: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { url: url.into(), name: name.into(), counter: OccurrenceCounter::new(content), score: None }
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn name(&self) -> &str { &self.name }
    pub fn content(&self) -> &str { self.counter.content() }
    pub fn counter(&self) -> &OccurrenceCounter { &self.counter }

    /// Last computed score; `None` until [`Page::compute_score`] has run.
    pub fn score(&self) -> Option<f64> { self.score }

    pub fn compute_score(&mut self, catalog: &KeywordCatalog) -> f64 {
        self.compute_score_with(catalog, &NoopObserver)
    }

    /// Sum of weight × occurrence count over the catalog, recomputed from zero.
    pub fn compute_score_with(&mut self, catalog: &KeywordCatalog, observer: &dyn ScoreObserver) -> f64 {
        let mut total = 0.0;
        for keyword in catalog {
            let count = self.counter.count(keyword.term());
            observer.keyword_counted(self, keyword, count);
            total += f64::from(keyword.weight()) * count as f64;
        }
        self.score = Some(total);
        observer.page_scored(self, total);
        total
    }

    /// Per-keyword breakdown behind the score, in catalog order.
    pub fn keyword_counts(&self, catalog: &KeywordCatalog) -> Vec<KeywordCount> {
        catalog.iter().map(|k: &Keyword| KeywordCount {
            term: k.term().to_string(),
            weight: k.weight(),
            count: self.counter.count(k.term()),
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;

    fn catalog(entries: &[(&str, Weight)]) -> KeywordCatalog {
        entries.iter().map(|&(t, w)| Keyword::new(t, w).unwrap()).collect()
    }

    #[test]
    fn weighted_sum() {
        let mut page = Page::from_content("https://example.com", "example", "cat cat dog");
        assert_eq!(page.score(), None);
        let score = page.compute_score(&catalog(&[("cat", 2), ("dog", 3)]));
        assert_eq!(score, 7.0);
        assert_eq!(page.score(), Some(7.0));
    }

    #[test]
    fn fetch_is_called_once_with_url() {
        let calls = Cell::new(0);
        let fetcher = |url: &str| {
            calls.set(calls.get() + 1);
            assert_eq!(url, "https://films.example/");
            Ok::<_, anyhow::Error>("Movie night: one movie".to_string())
        };
        let mut page = Page::fetch("https://films.example/", "films", &fetcher).unwrap();
        page.compute_score(&catalog(&[("movie", 5)]));
        page.compute_score(&catalog(&[("movie", 5)]));
        assert_eq!(calls.get(), 1);
        assert_eq!(page.score(), Some(10.0));
    }

    #[test]
    fn fetch_failure_carries_url() {
        let fetcher = |_: &str| -> anyhow::Result<String> { Err(anyhow!("connection refused")) };
        let err = Page::fetch("https://down.example/", "down", &fetcher).unwrap_err();
        match &err {
            ScoreError::FetchFailed { url, source } => {
                assert_eq!(url, "https://down.example/");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.url(), Some("https://down.example/"));
    }

    #[test]
    fn breakdown_matches_score() {
        let cat = catalog(&[("cat", 2), ("dog", 3), ("eel", 9)]);
        let mut page = Page::from_content("u", "n", "Cat, CAT and a dog");
        let counts = page.keyword_counts(&cat);
        assert_eq!(counts.iter().map(|c| c.count).collect::<Vec<_>>(), vec![2, 1, 0]);
        let sum: f64 = counts.iter().map(|c| c.weight as f64 * c.count as f64).sum();
        assert_eq!(page.compute_score(&cat), sum);
    }

    #[derive(Default)]
    struct Recorder {
        counted: Cell<usize>,
        scored: Cell<Option<f64>>,
    }

    impl ScoreObserver for Recorder {
        fn keyword_counted(&self, _page: &Page, _keyword: &Keyword, _count: usize) {
            self.counted.set(self.counted.get() + 1);
        }
        fn page_scored(&self, _page: &Page, score: f64) {
            self.scored.set(Some(score));
        }
    }

    #[test]
    fn observer_sees_every_keyword() {
        let rec = Recorder::default();
        let mut page = Page::from_content("u", "n", "dog");
        let score = page.compute_score_with(&catalog(&[("cat", 2), ("dog", 3)]), &rec);
        assert_eq!(rec.counted.get(), 2);
        assert_eq!(rec.scored.get(), Some(score));
    }
}
