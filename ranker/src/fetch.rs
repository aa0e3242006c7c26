use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use reqwest::{header, Client, Url};
use scoring::FetchContent;
use scraper::{Html, Selector};
use std::path::Path;
use std::time::Duration;
use tokio::runtime::Handle;

lazy_static! {
    static ref SEL_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref SEL_BODY: Selector = Selector::parse("body").expect("valid selector");
}

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub timeout: Duration,
    /// Responses larger than this are rejected.
    pub max_bytes: usize,
    /// Reduce HTML responses to their title and body text.
    pub extract_text: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: "keyword-ranker/0.1".to_string(),
            timeout: Duration::from_secs(12),
            max_bytes: 2 * 1024 * 1024,
            extract_text: true,
        }
    }
}

/// Blocking HTTP fetch on top of the async client.
///
/// `fetch` must be called off the async executor (e.g. from `spawn_blocking`),
/// since it blocks on the runtime behind `handle`.
pub struct HttpFetcher {
    client: Client,
    handle: Handle,
    opts: HttpOptions,
}

impl HttpFetcher {
    pub fn new(opts: HttpOptions, handle: Handle) -> Result<Self> {
        let client = Client::builder()
            .user_agent(opts.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(opts.timeout)
            .build()?;
        Ok(Self { client, handle, opts })
    }

    async fn get(&self, url: Url) -> Result<String> {
        let resp = self.client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            bail!("{} returned {}", url, resp.status());
        }
        let is_html = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v.starts_with("text/html"));
        if let Some(len) = resp.content_length() {
            if len > self.opts.max_bytes as u64 { bail!("{} is too large ({} bytes)", url, len); }
        }
        let bytes = resp.bytes().await?;
        if bytes.len() > self.opts.max_bytes { bail!("{} is too large ({} bytes)", url, bytes.len()); }
        let body = String::from_utf8_lossy(&bytes).into_owned();
        Ok(if is_html && self.opts.extract_text { html_text(&body) } else { body })
    }
}

impl FetchContent for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("invalid url {url}"))?;
        self.handle.block_on(self.get(url))
    }
}

/// Reads targets from the local filesystem; the target URL is a path.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    pub extract_text: bool,
}

impl FetchContent for FileFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = Path::new(url);
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let is_html = matches!(path.extension().and_then(|s| s.to_str()), Some("html" | "htm"));
        Ok(if is_html && self.extract_text { html_text(&text) } else { text })
    }
}

/// Title and body text of an HTML document, markup stripped.
pub fn html_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let title = doc.select(&SEL_TITLE).next().map(|n| n.text().collect::<String>()).unwrap_or_default();
    let body = doc
        .select(&SEL_BODY)
        .next()
        .map(|n| n.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let title = title.trim();
    let body = body.trim();
    if title.is_empty() { body.to_string() } else { format!("{title}\n{body}") }
}
