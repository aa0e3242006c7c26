use anyhow::Result;
use scoring::{KeywordCatalog, KeywordCount, Page};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::cmp::Ordering;
use std::io::Write;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Serialize)]
pub struct RankedPage {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub url: String,
    pub score: f64,
    pub counts: Vec<KeywordCount>,
    pub scored_at: String,
}

/// Order pages by descending score; equal scores keep their input order.
///
/// Pages that were never scored are scored against `catalog` first.
pub fn rank(pages: Vec<Page>, catalog: &KeywordCatalog) -> Vec<RankedPage> {
    let ts = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    let mut scored: Vec<(Page, f64)> = pages
        .into_iter()
        .map(|mut p| {
            let s = match p.score() { Some(s) => s, None => p.compute_score(catalog) };
            (p, s)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, (page, score))| {
            let mut hasher = Sha1::new();
            hasher.update(page.url().as_bytes());
            RankedPage {
                rank: i + 1,
                id: format!("{:x}", hasher.finalize()),
                name: page.name().to_string(),
                url: page.url().to_string(),
                score,
                counts: page.keyword_counts(catalog).into_iter().filter(|c| c.count > 0).collect(),
                scored_at: ts.clone(),
            }
        })
        .collect()
}

pub fn write_jsonl<W: Write>(out: &mut W, ranked: &[RankedPage]) -> Result<()> {
    for rec in ranked {
        serde_json::to_writer(&mut *out, rec)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_table<W: Write>(out: &mut W, ranked: &[RankedPage]) -> Result<()> {
    writeln!(out, "{:>4}  {:>8}  {:<24}  {}", "rank", "score", "name", "url")?;
    for rec in ranked {
        writeln!(out, "{:>4}  {:>8.1}  {:<24}  {}", rec.rank, rec.score, truncate(&rec.name, 24), rec.url)?;
    }
    out.flush()?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
    t.push('…');
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring::Keyword;

    fn catalog() -> KeywordCatalog {
        vec![Keyword::new("movie", 5).unwrap(), Keyword::new("oscars", 3).unwrap()].into_iter().collect()
    }

    #[test]
    fn ranks_by_descending_score_with_stable_ties() {
        let cat = catalog();
        let pages = vec![
            Page::from_content("https://a.example/", "a", "movie"),
            Page::from_content("https://b.example/", "b", "movie movie Oscars"),
            Page::from_content("https://c.example/", "c", "nothing"),
            Page::from_content("https://d.example/", "d", "MOVIE"),
        ];
        let ranked = rank(pages, &cat);
        let order: Vec<_> = ranked.iter().map(|r| (r.name.as_str(), r.rank, r.score)).collect();
        assert_eq!(order, vec![("b", 1, 13.0), ("a", 2, 5.0), ("d", 3, 5.0), ("c", 4, 0.0)]);
        assert_eq!(ranked[0].counts.len(), 2);
        assert!(ranked[3].counts.is_empty());
    }

    #[test]
    fn keeps_existing_scores() {
        let cat = catalog();
        let mut p = Page::from_content("https://a.example/", "a", "movie");
        p.compute_score(&cat);
        let ranked = rank(vec![p], &cat);
        assert_eq!(ranked[0].score, 5.0);
        assert_eq!(ranked[0].id.len(), 40);
    }

    #[test]
    fn jsonl_has_one_record_per_line() {
        let cat = catalog();
        let ranked = rank(vec![Page::from_content("u1", "a", "movie"), Page::from_content("u2", "b", "")], &cat);
        let mut buf = Vec::new();
        write_jsonl(&mut buf, &ranked).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["url"], "u1");
        assert_eq!(first["score"], 5.0);
        assert_eq!(first["counts"][0]["term"], "movie");
    }

    #[test]
    fn table_truncates_long_names() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdef", 4).chars().count(), 4);
        assert_eq!(truncate("abcdef", 0), "…");
    }
}
