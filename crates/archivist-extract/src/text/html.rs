//! `text/html` extraction tier: strip script/style/nav/header/footer,
//! prioritize finance/news containers, whitespace-normalize (spec §4.4).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const STRIP_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript"];

/// Selectors tried in priority order; the first that matches anything is
/// used as the extraction root instead of `<body>`, so boilerplate-heavy
/// financial/news pages surface their article body first.
const PRIORITY_CONTAINERS: &[&str] = &[
    "article",
    "div.article",
    "div.content",
    "div.story",
    "main",
    "div#content",
];

static STRIP_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&STRIP_TAGS.join(", ")).expect("static selector")
});

/// Extract the `<title>` text, if present, for use as a `CrawledDocument`
/// title (spec §3 CrawledDocument.title, §8 scenario 1).
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("static selector");
    document.select(&selector).next().map(|el| {
        let text = el.text().collect::<String>();
        normalize_whitespace(&text)
    }).filter(|t| !t.is_empty())
}

pub fn extract(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in PRIORITY_CONTAINERS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(el) = document.select(&selector).next() {
                let text = collect_text(el);
                if !text.trim().is_empty() {
                    return normalize_whitespace(&text);
                }
            }
        }
    }

    let body_selector = Selector::parse("body").expect("static selector");
    let text = document
        .select(&body_selector)
        .next()
        .map(collect_text)
        .unwrap_or_else(|| document.root_element().text().collect());
    normalize_whitespace(&text)
}

fn collect_text(root: ElementRef) -> String {
    let mut out = String::new();
    collect_text_into(root, &mut out);
    out
}

fn collect_text_into(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if STRIP_SELECTOR.matches(&child_el) {
                continue;
            }
            collect_text_into(child_el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_boilerplate_and_normalizes_whitespace() {
        let html = r#"
            <html><body>
              <header>Site Nav</header>
              <article>  Hello    World  </article>
              <footer>Copyright</footer>
            </body></html>
        "#;
        assert_eq!(extract(html), "Hello World");
    }

    #[test]
    fn falls_back_to_body_when_no_priority_container() {
        let html = "<html><body><script>evil()</script><p>Plain text</p></body></html>";
        assert_eq!(extract(html), "Plain text");
    }

    #[test]
    fn extracts_title() {
        let html = "<html><head><title>  Hello World  </title></head><body></body></html>";
        assert_eq!(extract_title(html), Some("Hello World".to_string()));
    }

    #[test]
    fn missing_title_is_none() {
        assert_eq!(extract_title("<html><body></body></html>"), None);
    }
}
