//! Link pages: platform rules plus whatever the page itself says.

use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::platforms::describe_url;
use crate::security::UrlPolicy;
use crate::text::{collapse_whitespace, truncate_chars};
use crate::types::{ContentCategory, PageSummary};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_META_CHARS: usize = 1000;
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Largest HTML body read from a link.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
/// Largest file downloaded from a public URL, same as the server's upload cap.
pub const MAX_DOWNLOAD_BYTES: usize = 25 * 1024 * 1024;

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref META_TAG_RE: Regex = Regex::new(r"(?is)<meta\b[^>]*>").unwrap();
    static ref ATTR_RE: Regex =
        Regex::new(r#"(?is)([a-z_:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref SCRIPT_RE: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap();
    static ref STYLE_RE: Regex = Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref HEAD_RE: Regex = Regex::new(r"(?is)<head\b[^>]*>.*?</head>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
}

/// Metadata scraped from an HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub body_snippet: Option<String>,
}

/// Pull title, description and a text snippet out of HTML with regexes.
pub fn parse_html(html: &str) -> PageMetadata {
    let title = TITLE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_inline(m.as_str(), MAX_TITLE_CHARS))
        .filter(|t| !t.is_empty());

    let meta_description = meta_content(html, "name", "description")
        .or_else(|| meta_content(html, "property", "og:description"))
        .map(|d| clean_inline(&d, MAX_META_CHARS))
        .filter(|d| !d.is_empty());

    let mut body = HEAD_RE.replace_all(html, " ").into_owned();
    for pattern in [&*SCRIPT_RE, &*STYLE_RE, &*COMMENT_RE] {
        body = pattern.replace_all(&body, " ").into_owned();
    }
    let body = TAG_RE.replace_all(&body, " ");
    let body_snippet = Some(clean_inline(&body, MAX_SNIPPET_CHARS)).filter(|s| !s.is_empty());

    PageMetadata {
        title,
        meta_description,
        body_snippet,
    }
}

/// `content` of the first `<meta>` whose `key` attribute equals `value`.
fn meta_content(html: &str, key: &str, value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|tag| {
        let mut matched = false;
        let mut content = None;
        for cap in ATTR_RE.captures_iter(tag.as_str()) {
            let name = cap[1].to_ascii_lowercase();
            let val = cap.get(2).or_else(|| cap.get(3)).map_or("", |m| m.as_str());
            if name == key && val.eq_ignore_ascii_case(value) {
                matched = true;
            } else if name == "content" {
                content = Some(val.to_string());
            }
        }
        if matched {
            content
        } else {
            None
        }
    })
}

fn clean_inline(raw: &str, max: usize) -> String {
    let text = collapse_whitespace(&decode_entities(raw));
    truncate_chars(&text, max).to_string()
}

/// Decode the handful of entities that show up in titles and descriptions.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Fetches pages and files for the extractor.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    policy: UrlPolicy,
    user_agent: String,
    page_limit: usize,
    download_limit: usize,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>, policy: UrlPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            policy,
            user_agent: user_agent.into(),
            page_limit: MAX_PAGE_BYTES,
            download_limit: MAX_DOWNLOAD_BYTES,
        }
    }

    pub fn with_byte_limits(mut self, page: usize, download: usize) -> Self {
        self.page_limit = page;
        self.download_limit = download;
        self
    }

    async fn get(
        &self,
        url: &str,
        category: ContentCategory,
    ) -> Result<reqwest::Response, AnalysisError> {
        let failed = |reason: String| AnalysisError::ExtractionFailed { category, reason };

        let url = self.policy.check(url).map_err(|e| failed(e.to_string()))?;
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status.as_u16())));
        }
        Ok(response)
    }

    /// GET an HTML page and scrape it.
    pub async fn fetch_page(
        &self,
        url: &str,
        category: ContentCategory,
    ) -> Result<PageMetadata, AnalysisError> {
        let response = self.get(url, category).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(AnalysisError::ExtractionFailed {
                category,
                reason: format!("not an HTML page: {content_type}"),
            });
        }

        let body = read_capped(response, self.page_limit, category).await?;
        Ok(parse_html(&String::from_utf8_lossy(&body)))
    }

    /// GET raw bytes (e.g. an uploaded PDF).
    pub async fn fetch_bytes(
        &self,
        url: &str,
        category: ContentCategory,
    ) -> Result<Vec<u8>, AnalysisError> {
        let response = self.get(url, category).await?;
        read_capped(response, self.download_limit, category).await
    }
}

/// Read a response body, failing as soon as it grows past `limit` bytes.
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
    category: ContentCategory,
) -> Result<Vec<u8>, AnalysisError> {
    let too_large = || AnalysisError::ExtractionFailed {
        category,
        reason: format!("body larger than {limit} bytes"),
    };

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AnalysisError::ExtractionFailed {
            category,
            reason: e.to_string(),
        })?
    {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Describe a link, enriched with the fetched page when a fetcher is given.
pub async fn summarize_link(
    url: &str,
    category: ContentCategory,
    fetcher: Option<&PageFetcher>,
) -> PageSummary {
    let rule = describe_url(url);
    let mut summary = PageSummary {
        platform: rule.platform,
        platform_title: rule.title,
        platform_description: rule.description,
        title: None,
        meta_description: None,
        body_snippet: None,
        fetched: false,
    };

    if let Some(fetcher) = fetcher {
        match fetcher.fetch_page(url, category).await {
            Ok(page) => {
                summary.title = page.title;
                summary.meta_description = page.meta_description;
                summary.body_snippet = page.body_snippet;
                summary.fetched = true;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Page fetch failed, using URL pattern analysis");
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>  Acme   Widget &amp; Co </title>
  <meta content="A tiny widget library" name="description">
  <meta property="og:description" content="OG text">
  <style>body { color: red }</style>
</head>
<body>
  <script>var x = "<b>hidden</b>";</script>
  <h1>Widget</h1>
  <p>Builds   widgets
     fast.</p>
  <!-- comment -->
</body>
</html>"#;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(
            Duration::from_secs(5),
            "Portflow Portfolio Builder",
            UrlPolicy::new().allow_private_hosts(true),
        )
    }

    #[test]
    fn test_parse_html() {
        let meta = parse_html(PAGE);
        assert_eq!(meta.title.as_deref(), Some("Acme Widget & Co"));
        assert_eq!(meta.meta_description.as_deref(), Some("A tiny widget library"));
        assert_eq!(meta.body_snippet.as_deref(), Some("Widget Builds widgets fast."));
    }

    #[test]
    fn test_og_description_fallback() {
        let meta = parse_html(r#"<meta property='og:description' content='From OG'>"#);
        assert_eq!(meta.meta_description.as_deref(), Some("From OG"));
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_caps_lengths() {
        let html = format!(
            "<title>{}</title><meta name=\"description\" content=\"{}\"><p>{}</p>",
            "t".repeat(500),
            "d".repeat(5000),
            "word ".repeat(500)
        );
        let meta = parse_html(&html);
        assert_eq!(meta.title.unwrap().chars().count(), MAX_TITLE_CHARS);
        assert_eq!(meta.meta_description.unwrap().chars().count(), MAX_META_CHARS);
        assert!(meta.body_snippet.unwrap().chars().count() <= MAX_SNIPPET_CHARS);
    }

    #[tokio::test]
    async fn test_summarize_link_with_fetch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/acme/widget")
            .match_header("user-agent", "Portflow Portfolio Builder")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .create_async()
            .await;

        let url = format!("{}/acme/widget", server.url());
        let f = fetcher();
        let summary = summarize_link(&url, ContentCategory::GenericLink, Some(&f)).await;

        mock.assert_async().await;
        assert!(summary.fetched);
        assert_eq!(summary.best_title(), "Acme Widget & Co");
        assert_eq!(summary.platform, "Website");
        assert_eq!(summary.platform_title, "Widget");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_platform_rule() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let f = fetcher();
        let summary = summarize_link(&url, ContentCategory::GenericLink, Some(&f)).await;

        assert!(!summary.fetched);
        assert_eq!(summary.best_title(), "Missing");
    }

    #[tokio::test]
    async fn test_oversized_bodies_are_rejected() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/big")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(format!("<html><title>Big</title>{}</html>", "x".repeat(4096)))
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/deck.pdf")
            .with_status(200)
            .with_body(vec![b'%'; 4096])
            .create_async()
            .await;

        let f = fetcher().with_byte_limits(1024, 1024);
        let err = f
            .fetch_page(&format!("{}/big", server.url()), ContentCategory::GenericLink)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("larger than 1024 bytes"));

        let err = f
            .fetch_bytes(&format!("{}/deck.pdf", server.url()), ContentCategory::Pdf)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("larger than 1024 bytes"));

        let small = fetcher()
            .with_byte_limits(8192, 8192)
            .fetch_bytes(&format!("{}/deck.pdf", server.url()), ContentCategory::Pdf)
            .await
            .unwrap();
        assert_eq!(small.len(), 4096);
    }

    #[tokio::test]
    async fn test_non_html_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/data.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let err = fetcher()
            .fetch_page(&format!("{}/data.json", server.url()), ContentCategory::GenericLink)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not an HTML page"));
    }

    #[tokio::test]
    async fn test_default_policy_blocks_loopback() {
        let f = PageFetcher::new(Duration::from_secs(1), "ua", UrlPolicy::new());
        let err = f
            .fetch_page("http://127.0.0.1:9/", ContentCategory::GenericLink)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionFailed { .. }));
    }

    #[tokio::test]
    async fn test_without_fetcher_uses_rules_only() {
        let summary =
            summarize_link("https://github.com/acme/widget", ContentCategory::Github, None).await;
        assert!(!summary.fetched);
        assert_eq!(summary.best_title(), "Widget");
        assert!(summary.best_description().contains("acme"));
    }
}
