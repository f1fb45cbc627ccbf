//! High-level Object Store Adapter operations layered over [`BlobStore`]:
//! storing a crawled document's body + sidecar together, and the
//! metadata-first-then-probe retrieval path (spec §4.5).

use crate::blob::BlobStore;
use crate::error::StorageError;
use crate::keys;
use archivist_types::{ContentType, DocId, DocumentMetadata, TaskId};

#[derive(Clone)]
pub struct ObjectStoreAdapter {
    blobs: BlobStore,
}

impl ObjectStoreAdapter {
    pub fn new(blobs: BlobStore) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Persist a crawled document's raw body and its sidecar metadata
    /// descriptor together (spec §4.5 key schema).
    pub async fn put_crawled_document(
        &self,
        user_id: &str,
        task_id: &TaskId,
        doc_id: &DocId,
        content_type: ContentType,
        body: Vec<u8>,
        metadata: &DocumentMetadata,
    ) -> Result<(String, String), StorageError> {
        let body_key = keys::crawled_document_body_key(user_id, task_id, doc_id, content_type);
        let metadata_key = keys::crawled_document_metadata_key(user_id, task_id, doc_id);

        self.blobs.put(&body_key, body).await?;
        // The sidecar must record its own keys so `get_document_body` can
        // take the fast path instead of falling back to probing (spec
        // §4.5 "Retrieval path").
        let mut metadata = metadata.clone();
        metadata.body_key = body_key.clone();
        metadata.metadata_key = metadata_key.clone();
        let metadata_bytes = serde_json::to_vec(&metadata)?;
        self.blobs.put(&metadata_key, metadata_bytes).await?;

        Ok((body_key, metadata_key))
    }

    pub async fn put_uploaded_document(
        &self,
        user_id: &str,
        file_id: &str,
        filename: &str,
        body: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = keys::uploaded_document_key(user_id, file_id, filename);
        self.blobs.put(&key, body).await?;
        Ok(key)
    }

    pub async fn put_temp(&self, file_id: &str, filename: &str, body: Vec<u8>) -> Result<String, StorageError> {
        let key = keys::temp_key(file_id, filename);
        self.blobs.put(&key, body).await?;
        Ok(key)
    }

    pub async fn get_metadata(&self, metadata_key: &str) -> Result<DocumentMetadata, StorageError> {
        let bytes = self.blobs.get(metadata_key).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch a document's body: try the sidecar's recorded `body_key`
    /// first, then probe candidate extensions in priority order (spec
    /// §4.5 "Retrieval path").
    pub async fn get_document_body(
        &self,
        user_id: &str,
        task_id: &TaskId,
        doc_id: &DocId,
    ) -> Result<Vec<u8>, StorageError> {
        let metadata_key = keys::crawled_document_metadata_key(user_id, task_id, doc_id);
        if let Ok(metadata) = self.get_metadata(&metadata_key).await {
            if let Ok(bytes) = self.blobs.get(&metadata.body_key).await {
                return Ok(bytes.to_vec());
            }
        }

        for candidate in keys::candidate_body_keys(user_id, task_id, doc_id) {
            if let Ok(bytes) = self.blobs.get(&candidate).await {
                return Ok(bytes.to_vec());
            }
        }

        Err(StorageError::NotFound(format!(
            "no body found for doc_id={doc_id} under task {task_id}"
        )))
    }

    /// Delete a crawled document's body and sidecar metadata blob
    /// (spec §8 round-trip law: deleting a task deletes all its documents
    /// from the object store). Missing blobs are not an error.
    pub async fn delete_crawled_document(
        &self,
        user_id: &str,
        task_id: &TaskId,
        doc_id: &DocId,
    ) -> Result<(), StorageError> {
        let metadata_key = keys::crawled_document_metadata_key(user_id, task_id, doc_id);
        let mut targets = vec![metadata_key.clone()];
        match self.get_metadata(&metadata_key).await {
            Ok(metadata) => targets.push(metadata.body_key),
            Err(_) => targets.extend(keys::candidate_body_keys(user_id, task_id, doc_id)),
        }
        self.blobs.delete(&targets).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_types::now;
    use std::collections::BTreeMap;

    fn sample_metadata(doc_id: DocId, task_id: TaskId, body_key: String, metadata_key: String) -> DocumentMetadata {
        DocumentMetadata {
            doc_id,
            url: "https://example.com/report.pdf".into(),
            title: Some("Report".into()),
            content_type: ContentType::Pdf,
            content_length: 5,
            raw_content_length: 5,
            fetched_at: now(),
            status_code: Some(200),
            headers: BTreeMap::new(),
            domain: "example.com".into(),
            filename: "report.pdf".into(),
            stored_at: now(),
            body_key,
            metadata_key,
            user_id: "alice".into(),
            task_id,
        }
    }

    #[tokio::test]
    async fn retrieval_prefers_sidecar_body_key_over_probing() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ObjectStoreAdapter::new(BlobStore::local(dir.path()).unwrap());
        let task_id = TaskId::new();
        let doc_id = DocId::from_hex("abcdefabcdefabcd".to_string());

        let metadata = sample_metadata(
            doc_id.clone(),
            task_id.clone(),
            keys::crawled_document_body_key("alice", &task_id, &doc_id, ContentType::Pdf),
            keys::crawled_document_metadata_key("alice", &task_id, &doc_id),
        );
        adapter
            .put_crawled_document(
                "alice",
                &task_id,
                &doc_id,
                ContentType::Pdf,
                b"hello".to_vec(),
                &metadata,
            )
            .await
            .unwrap();

        let body = adapter.get_document_body("alice", &task_id, &doc_id).await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn retrieval_falls_back_to_probing_when_sidecar_missing() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ObjectStoreAdapter::new(BlobStore::local(dir.path()).unwrap());
        let task_id = TaskId::new();
        let doc_id = DocId::from_hex("0011223344556677".to_string());

        let body_key = keys::crawled_document_body_key("bob", &task_id, &doc_id, ContentType::Html);
        adapter.blobs().put(&body_key, b"<p>hi</p>".to_vec()).await.unwrap();

        let body = adapter.get_document_body("bob", &task_id, &doc_id).await.unwrap();
        assert_eq!(body, b"<p>hi</p>");
    }

    #[tokio::test]
    async fn delete_crawled_document_removes_body_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ObjectStoreAdapter::new(BlobStore::local(dir.path()).unwrap());
        let task_id = TaskId::new();
        let doc_id = DocId::from_hex("fedcba9876543210".to_string());

        let metadata = sample_metadata(
            doc_id.clone(),
            task_id.clone(),
            keys::crawled_document_body_key("alice", &task_id, &doc_id, ContentType::Pdf),
            keys::crawled_document_metadata_key("alice", &task_id, &doc_id),
        );
        adapter
            .put_crawled_document("alice", &task_id, &doc_id, ContentType::Pdf, b"hello".to_vec(), &metadata)
            .await
            .unwrap();

        adapter.delete_crawled_document("alice", &task_id, &doc_id).await.unwrap();

        assert!(adapter.get_document_body("alice", &task_id, &doc_id).await.is_err());
        let metadata_key = keys::crawled_document_metadata_key("alice", &task_id, &doc_id);
        assert!(adapter.get_metadata(&metadata_key).await.is_err());
    }
}
