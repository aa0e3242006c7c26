use crate::{ScoreError, Weight};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A search term and the weight each of its occurrences contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KeywordRecord")]
pub struct Keyword {
    term: String,
    weight: Weight,
}

#[derive(Deserialize)]
struct KeywordRecord {
    term: String,
    weight: Weight,
}

impl TryFrom<KeywordRecord> for Keyword {
    type Error = ScoreError;

    fn try_from(rec: KeywordRecord) -> Result<Self, Self::Error> {
        Keyword::new(rec.term, rec.weight)
    }
}

impl Keyword {
    pub fn new(term: impl Into<String>, weight: Weight) -> Result<Self, ScoreError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(ScoreError::InvalidArgument("keyword term must not be empty".into()));
        }
        Ok(Self { term, weight })
    }

    pub fn term(&self) -> &str { &self.term }
    pub fn weight(&self) -> Weight { self.weight }
}

/// Fixed, ordered set of keywords used for one scoring run.
///
/// Built once and shared read-only by every page that gets scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordCatalog {
    keywords: Vec<Keyword>,
}

impl KeywordCatalog {
    pub fn new(keywords: Vec<Keyword>) -> Self { Self { keywords } }

    /// The film-domain list the ranker ships with.
    pub fn builtin() -> Self {
        const ENTRIES: &[(&str, Weight)] = &[
            ("電影", 5),
            ("movie", 5),
            ("好萊塢", 2),
            ("Hollywood", 2),
            ("影城", 3),
            ("影展", 3),
            ("奧斯卡", 3),
            ("Oscars", 3),
            ("金馬獎", 3),
            ("金獅獎", 3),
            ("二輪戲院", 2),
        ];
        let keywords = ENTRIES
            .iter()
            .map(|&(term, weight)| Keyword { term: term.to_string(), weight })
            .collect();
        Self { keywords }
    }

    /// Parse a JSON array of `{"term": ..., "weight": ...}` records.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let catalog: KeywordCatalog = serde_json::from_str(s).context("parse keyword catalog")?;
        Ok(catalog)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open keyword catalog {}", path.display()))?;
        let catalog: KeywordCatalog = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse keyword catalog {}", path.display()))?;
        tracing::debug!(path = %path.display(), keywords = catalog.len(), "loaded keyword catalog");
        Ok(catalog)
    }

    /// Catalog from `path` when given, the builtin list otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> { self.keywords.iter() }
    pub fn len(&self) -> usize { self.keywords.len() }
    pub fn is_empty(&self) -> bool { self.keywords.is_empty() }
}

impl<'a> IntoIterator for &'a KeywordCatalog {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter { self.keywords.iter() }
}

impl FromIterator<Keyword> for KeywordCatalog {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        Self { keywords: iter.into_iter().collect() }
    }
}
