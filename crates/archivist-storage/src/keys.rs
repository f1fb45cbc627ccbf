//! Deterministic key layout for the blob store (spec §4.5).

use archivist_types::{ContentType, DocId, TaskId};

const SANITIZE_CHARS: &[char] = &['/', '\\', ' ', ':', '*', '?', '"', '<', '>', '|'];

/// Replace filesystem/object-key-unsafe characters with `_` (spec §4.5
/// "Sanitization").
pub fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| if SANITIZE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `crawled_documents/<user_id>/<task_id>/<doc_id>.<ext>`
pub fn crawled_document_body_key(user_id: &str, task_id: &TaskId, doc_id: &DocId, content_type: ContentType) -> String {
    format!(
        "crawled_documents/{}/{}/{}.{}",
        sanitize(user_id),
        task_id,
        doc_id,
        content_type.default_extension()
    )
}

/// `crawled_documents/<user_id>/<task_id>/<doc_id>_metadata.json`
pub fn crawled_document_metadata_key(user_id: &str, task_id: &TaskId, doc_id: &DocId) -> String {
    format!(
        "crawled_documents/{}/{}/{}_metadata.json",
        sanitize(user_id),
        task_id,
        doc_id
    )
}

/// `uploaded_documents/<user_id>/<file_id>/<filename>`
pub fn uploaded_document_key(user_id: &str, file_id: &str, filename: &str) -> String {
    format!(
        "uploaded_documents/{}/{}/{}",
        sanitize(user_id),
        sanitize(file_id),
        sanitize(filename)
    )
}

/// `temp/<file_id>/<filename>`
pub fn temp_key(file_id: &str, filename: &str) -> String {
    format!("temp/{}/{}", sanitize(file_id), sanitize(filename))
}

/// Candidate body keys to probe, in priority order, when the metadata
/// sidecar for a document is missing (spec §4.5 "Retrieval path").
pub fn candidate_body_keys(user_id: &str, task_id: &TaskId, doc_id: &DocId) -> Vec<String> {
    ContentType::probe_order()
        .iter()
        .map(|ext| {
            format!(
                "crawled_documents/{}/{}/{}.{}",
                sanitize(user_id),
                task_id,
                doc_id,
                ext
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize("my report: final?.pdf"), "my_report__final_.pdf");
    }

    #[test]
    fn body_key_matches_spec_layout() {
        let task_id = TaskId::new();
        let doc_id = DocId::from_hex("0123456789abcdef".to_string());
        let key = crawled_document_body_key("alice", &task_id, &doc_id, ContentType::Pdf);
        assert_eq!(key, format!("crawled_documents/alice/{task_id}/{doc_id}.pdf"));
    }

    #[test]
    fn candidate_keys_follow_probe_order() {
        let task_id = TaskId::new();
        let doc_id = DocId::from_hex("0123456789abcdef".to_string());
        let keys = candidate_body_keys("alice", &task_id, &doc_id);
        assert!(keys[0].ends_with(".html"));
        assert!(keys.last().unwrap().ends_with(".txt"));
    }
}
