use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// A page to fetch and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub url: String,
}

pub fn load_seeds<P: AsRef<Path>>(path: P) -> Result<Vec<Target>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read seeds {}", path.display()))?;
    parse_seeds(&text)
}

/// Parse a seed list: one `URL`, `NAME<TAB>URL` or `NAME | URL` per line.
///
/// Blank lines and `#` comments are skipped, unparseable lines are logged and
/// dropped, and repeated URLs are kept once.
pub fn parse_seeds(text: &str) -> Result<Vec<Target>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') { continue; }
        let (name, raw) = match l.split_once('\t').or_else(|| l.split_once(" | ")) {
            Some((n, u)) => (Some(n.trim()), u.trim()),
            None => (None, l),
        };
        let Some(url) = parse_url(raw) else {
            tracing::warn!(line = lineno + 1, value = raw, "skipping invalid seed");
            continue;
        };
        let key = norm(&url);
        if !seen.insert(key.clone()) { continue; }
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => url.host_str().unwrap_or(&key).to_string(),
        };
        targets.push(Target { name, url: key });
    }
    if targets.is_empty() { return Err(anyhow!("no valid seeds")); }
    Ok(targets)
}

/// Targets for local files: `input` itself, or every file below it whose
/// extension is in `exts`. The file path stands in for the URL.
pub fn local_targets(input: &Path, exts: &[String]) -> Result<Vec<Target>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if !p.is_file() { continue; }
            if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                if exts.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext)) {
                    files.push(p.to_path_buf());
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    if files.is_empty() { return Err(anyhow!("no input files under {}", input.display())); }

    Ok(files
        .into_iter()
        .map(|p| Target {
            name: p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
            url: p.to_string_lossy().into_owned(),
        })
        .collect())
}

fn parse_url(s: &str) -> Option<Url> {
    let u = match Url::parse(s) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        _ => Url::parse(&format!("https://{}", s)).ok()?,
    };
    u.host_str()?;
    Some(u)
}

fn norm(u: &Url) -> String { let mut s = u.clone(); s.set_fragment(None); s.to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_named_lines() {
        let t = parse_seeds(
            "# films\n\
             https://www.imdb.com/\n\
             Atmovies\thttps://www.atmovies.com.tw/movie/\n\
             Letterboxd | letterboxd.com\n",
        )
        .unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t[0], Target { name: "www.imdb.com".into(), url: "https://www.imdb.com/".into() });
        assert_eq!(t[1].name, "Atmovies");
        assert_eq!(t[1].url, "https://www.atmovies.com.tw/movie/");
        assert_eq!(t[2].name, "Letterboxd");
        assert_eq!(t[2].url, "https://letterboxd.com/");
    }

    #[test]
    fn drops_duplicates_ignoring_fragment() {
        let t = parse_seeds("https://a.example/x#top\nhttps://a.example/x\n").unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].url, "https://a.example/x");
    }

    #[test]
    fn adds_https_to_bare_hosts() {
        let t = parse_seeds("localhost:8080/films").unwrap();
        assert_eq!(t[0].url, "https://localhost:8080/films");
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(parse_seeds("# nothing here\n\n").is_err());
    }
}
