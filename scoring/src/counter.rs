/// Case-insensitive, non-overlapping occurrence counting over a fixed text.
///
/// The text is folded to upper case once, at construction. Every `count`
/// call folds the search term the same way and scans the folded copy left to
/// right, resuming right after the end of each match, so "AA" occurs once in
/// "AAA".
#[derive(Debug, Clone)]
pub struct OccurrenceCounter {
    content: String,
    folded: String,
}

impl OccurrenceCounter {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let folded = fold(&content);
        Self { content, folded }
    }

    pub fn content(&self) -> &str { &self.content }

    /// Number of matches of `term`. An empty term never matches.
    pub fn count(&self, term: &str) -> usize {
        if term.is_empty() { return 0; }
        let needle = fold(term);
        if needle.is_empty() { return 0; }
        // str::matches already skips past each match, which gives the non-overlapping scan.
        self.folded.matches(needle.as_str()).count()
    }
}

/// One-shot variant of [`OccurrenceCounter::count`].
pub fn count_occurrences(text: &str, term: &str) -> usize {
    OccurrenceCounter::new(text).count(term)
}

fn fold(s: &str) -> String { s.to_uppercase() }
