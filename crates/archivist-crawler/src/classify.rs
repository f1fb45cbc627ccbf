//! Content-type detection and the "did the HTML actually render" check
//! that drives the one-shot JS-rendering retry (spec §4.3 step 3d).

use archivist_types::ContentType;
use std::collections::HashMap;

/// Derive a `ContentType` from the response `Content-Type` header first,
/// falling back to the URL's file extension.
pub fn classify(url: &str, headers: &HashMap<String, String>) -> ContentType {
    if let Some(content_type_header) = headers.get("content-type").or_else(|| headers.get("Content-Type")) {
        let mime = content_type_header.split(';').next().unwrap_or("").trim();
        if let Some(ct) = from_mime(mime) {
            return ct;
        }
    }
    let ext = url
        .rsplit('/')
        .next()
        .and_then(|last| last.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("");
    ContentType::from_extension(ext)
}

fn from_mime(mime: &str) -> Option<ContentType> {
    Some(match mime {
        "text/html" => ContentType::Html,
        "application/pdf" => ContentType::Pdf,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" | "application/msword" => {
            ContentType::Docx
        }
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" | "application/vnd.ms-excel" => {
            ContentType::Xlsx
        }
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" | "application/vnd.ms-powerpoint" => {
            ContentType::Pptx
        }
        "text/csv" => ContentType::Csv,
        "application/json" => ContentType::Json,
        "text/plain" => ContentType::Text,
        m if m.starts_with("image/") => ContentType::Image,
        _ => return None,
    })
}

/// True when a fetched HTML page looks like it needs JS rendering: too
/// small, or missing a `<body>` tag entirely (spec §4.3 step 3d).
pub fn html_looks_incomplete(body: &[u8]) -> bool {
    if body.len() < 1024 {
        return true;
    }
    let text = String::from_utf8_lossy(body);
    !text.to_lowercase().contains("<body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_from_content_type_header() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/pdf; charset=binary".to_string());
        assert_eq!(classify("https://x.com/a", &headers), ContentType::Pdf);
    }

    #[test]
    fn falls_back_to_url_extension() {
        let headers = HashMap::new();
        assert_eq!(classify("https://x.com/report.xlsx", &headers), ContentType::Xlsx);
    }

    #[test]
    fn small_body_looks_incomplete() {
        assert!(html_looks_incomplete(b"<html></html>"));
    }

    #[test]
    fn body_without_body_tag_looks_incomplete() {
        let mut padding = vec![b' '; 2000];
        padding.extend_from_slice(b"<html><head></head></html>");
        assert!(html_looks_incomplete(&padding));
    }

    #[test]
    fn well_formed_page_looks_complete() {
        let mut html = b"<html><body>".to_vec();
        html.extend_from_slice(&vec![b'x'; 2000]);
        html.extend_from_slice(b"</body></html>");
        assert!(!html_looks_incomplete(&html));
    }
}
