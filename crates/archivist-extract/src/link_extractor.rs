//! Link Extractor (spec §4.2). Scans `<a href>`, `onclick` handlers,
//! `data-url` attributes, and `<script>` bodies, and classifies every
//! discovered URL as a same-domain page, a document artifact, or
//! irrelevant. Grounded on the original Python
//! `crawler/link_extractor.py`'s `LinkExtractor`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xlsx", "xls", "ppt", "pptx", "csv", "json",
];

const DOCUMENT_PATH_PATTERNS: &[&str] = &["/pdf/", "/document/", "/file/", "/download/"];

const FINANCIAL_DOC_PHRASES: &[&str] = &[
    "annual-report",
    "quarterly-report",
    "earnings-report",
    "financial-report",
    "sec-filing",
    "10-k",
    "10-q",
    "8-k",
    "proxy",
    "prospectus",
    "financial-statement",
    "filing",
];

const JSON_EXCLUDE_PATTERNS: &[&str] = &[
    "customresponse.json",
    "api.json",
    "config.json",
    "settings.json",
    "data.json",
    "response.json",
    "result.json",
    "status.json",
    "health.json",
    "metrics.json",
    "stats.json",
    "swagger",
    "openapi",
    "schema",
];

const API_PATH_PATTERNS: &[&str] = &["/api/", "/v1/", "/v2/", "/v3/", "/rest/", "/graphql/"];
const API_QUERY_PARAMS: &[&str] = &["api_key", "token", "auth", "callback"];

const EXCLUDE_PAGE_PATTERNS: &[&str] = &[
    "login", "admin", "private", "internal", "test", "dev", "temp", "cache", "session",
    "cookie", "tracking", "advertisement", "subscribe", "newsletter",
];

static URL_IN_JS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"](https?://[^'"]+|/[^'"\s]+\.(?:pdf|docx?|xlsx?|pptx?|csv|json))['"]"#).unwrap());

static A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ONCLICK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[onclick]").unwrap());
static DATA_URL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("[data-url]").unwrap());
static SCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("script").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub page_links: Vec<String>,
    pub document_links: Vec<String>,
}

/// Extract and classify links from an HTML body relative to `base_url`
/// (spec §4.2). Deterministic given the same inputs (spec §8 property 6).
pub fn extract_links(html: &str, base_url: &str) -> ExtractedLinks {
    let Ok(base) = Url::parse(base_url) else {
        return ExtractedLinks::default();
    };
    let document = Html::parse_document(html);

    let mut page_links: BTreeSet<String> = BTreeSet::new();
    let mut document_links: BTreeSet<String> = BTreeSet::new();

    for a in document.select(&A_SELECTOR) {
        if let Some(href) = a.value().attr("href") {
            let text = a.text().collect::<String>();
            classify(href, &text, &base, &mut page_links, &mut document_links);
        }
    }

    for el in document.select(&ONCLICK_SELECTOR) {
        if let Some(onclick) = el.value().attr("onclick") {
            for candidate in extract_urls_from_js(onclick) {
                classify(&candidate, "", &base, &mut page_links, &mut document_links);
            }
        }
    }

    for el in document.select(&DATA_URL_SELECTOR) {
        if let Some(data_url) = el.value().attr("data-url") {
            classify(data_url, "", &base, &mut page_links, &mut document_links);
        }
    }

    for script in document.select(&SCRIPT_SELECTOR) {
        let body = script.text().collect::<String>();
        for candidate in extract_urls_from_js(&body) {
            classify(&candidate, "", &base, &mut page_links, &mut document_links);
        }
    }

    let mut document_links: Vec<String> = document_links.into_iter().collect();
    // Prioritize PDFs first (spec §4.2).
    document_links.sort_by_key(|u| !u.to_lowercase().ends_with(".pdf"));

    ExtractedLinks {
        page_links: page_links.into_iter().collect(),
        document_links,
    }
}

fn extract_urls_from_js(code: &str) -> Vec<String> {
    URL_IN_JS
        .captures_iter(code)
        .map(|c| c[1].to_string())
        .collect()
}

fn classify(
    raw: &str,
    link_text: &str,
    base: &Url,
    page_links: &mut BTreeSet<String>,
    document_links: &mut BTreeSet<String>,
) {
    let Some(full) = resolve_and_clean(raw, base) else {
        return;
    };
    let Ok(parsed) = Url::parse(&full) else {
        return;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return;
    }
    if parsed.host_str() != base.host_str() {
        return;
    }

    if is_document_link(&full) {
        document_links.insert(full);
    } else if is_relevant_page_link(&full, link_text) {
        page_links.insert(full);
    }
}

fn resolve_and_clean(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    if raw.to_lowercase().starts_with("javascript:") || raw.to_lowercase().starts_with("mailto:")
    {
        return None;
    }
    // Strip JS appended after a closing paren, e.g. `url(); doSomething()`.
    let raw = raw.split(");").next().unwrap_or(raw);
    let mut resolved = base.join(raw).ok()?;
    resolved.set_fragment(None);
    normalize_query_and_path(&mut resolved);
    Some(resolved.to_string())
}

/// Strip JS-polluted query parameters, collapse multi-encoded `&amp;`,
/// and remove a trailing slash on what looks like a file path rather than
/// a directory (spec §4.2 Normalization).
fn normalize_query_and_path(url: &mut Url) {
    if let Some(query) = url.query() {
        let cleaned = query.replace("&amp;", "&");
        if cleaned.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&cleaned));
        }
    }
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') && !path.ends_with("//") {
        url.set_path(path.trim_end_matches('/'));
    }
}

fn is_document_link(url: &str) -> bool {
    let lower = url.to_lowercase();

    let has_extension = DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")));
    let has_path_pattern = DOCUMENT_PATH_PATTERNS.iter().any(|p| lower.contains(p));
    let has_financial_phrase = FINANCIAL_DOC_PHRASES.iter().any(|p| lower.contains(p));

    if !(has_extension || has_path_pattern || has_financial_phrase) {
        return false;
    }

    if JSON_EXCLUDE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    if API_PATH_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    if lower.contains('?') && API_QUERY_PARAMS.iter().any(|p| lower.contains(p)) {
        return false;
    }

    true
}

fn is_relevant_page_link(url: &str, link_text: &str) -> bool {
    let lower = url.to_lowercase();
    let text_lower = link_text.to_lowercase();

    if EXCLUDE_PAGE_PATTERNS
        .iter()
        .any(|p| lower.contains(p) || text_lower.contains(p))
    {
        return false;
    }
    // Permissive by design: anything not explicitly excluded is kept so
    // the crawler has candidate pages to traverse (spec §4.2).
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
          <a href="/about">About</a>
          <a href="/login">Login</a>
          <a href="report.pdf">Annual Report</a>
          <a href="https://other.test/x">Off-domain</a>
          <button onclick="openDoc('/files/filing.docx')">Open</button>
          <div data-url="/data/summary.csv"></div>
          <script>var u = "/api/v1/data.json";</script>
        </body></html>
    "#;

    #[test]
    fn classifies_pages_and_documents() {
        let result = extract_links(HTML, "https://example.test/index.html");
        assert!(result.page_links.iter().any(|u| u.ends_with("/about")));
        assert!(!result.page_links.iter().any(|u| u.contains("login")));
        assert!(!result
            .page_links
            .iter()
            .any(|u| u.contains("other.test")));
        assert!(result.document_links.iter().any(|u| u.ends_with(".pdf")));
        assert!(result
            .document_links
            .iter()
            .any(|u| u.ends_with("filing.docx")));
        assert!(result.document_links.iter().any(|u| u.ends_with(".csv")));
        assert!(!result.document_links.iter().any(|u| u.contains("/api/")));
    }

    #[test]
    fn pdf_links_sort_first() {
        let html = r#"<a href="a.csv">a</a><a href="b.pdf">b</a>"#;
        let result = extract_links(html, "https://example.test/");
        assert!(result.document_links[0].ends_with(".pdf"));
    }

    #[test]
    fn deterministic_output() {
        let a = extract_links(HTML, "https://example.test/index.html");
        let b = extract_links(HTML, "https://example.test/index.html");
        assert_eq!(a, b);
    }
}
