//! Blob store over the `object_store` crate (spec §4.5). One trait gives
//! S3/GCS/Azure/local-disk backends for the "opaque blob store with
//! list/get/put/delete" contract without writing a backend-specific
//! client per provider.

use crate::error::StorageError;
use bytes::Bytes;
use object_store::{path::Path as ObjectPath, ObjectStore, PutPayload};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HeadInfo {
    pub size: u64,
    pub etag: Option<String>,
}

/// Thin wrapper over a boxed `object_store::ObjectStore`, providing the
/// spec's put/get/head/list/delete/exists contract with string keys
/// (object_store's `Path` type is constructed internally).
#[derive(Clone)]
pub struct BlobStore {
    inner: Arc<dyn ObjectStore>,
}

impl BlobStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// Local-disk backend rooted at `root`, for development and tests.
    pub fn local(root: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        let fs = object_store::local::LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(fs)))
    }

    pub async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let path = ObjectPath::from(key);
        self.inner.put(&path, PutPayload::from(bytes)).await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = ObjectPath::from(key);
        let result = self.inner.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::Backend(other),
        })?;
        Ok(result.bytes().await?)
    }

    pub async fn head(&self, key: &str) -> Result<HeadInfo, StorageError> {
        let path = ObjectPath::from(key);
        let meta = self.inner.head(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::Backend(other),
        })?;
        Ok(HeadInfo {
            size: meta.size as u64,
            etag: meta.e_tag,
        })
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        use futures::StreamExt;
        let prefix_path = ObjectPath::from(prefix);
        let mut stream = self.inner.list(Some(&prefix_path));
        let mut out = Vec::new();
        while let Some(meta) = stream.next().await {
            out.push(meta?.location.to_string());
        }
        Ok(out)
    }

    pub async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            let path = ObjectPath::from(key.as_str());
            match self.inner.delete(&path).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_bytes_through_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::local(dir.path()).unwrap();
        store.put("a/b.txt", b"hello".to_vec()).await.unwrap();
        let bytes = store.get("a/b.txt").await.unwrap();
        assert_eq!(&bytes[..], b"hello");
        assert!(store.exists("a/b.txt").await.unwrap());
        assert!(!store.exists("a/missing.txt").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_keys_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::local(dir.path()).unwrap();
        store.put("crawled_documents/u/t/doc1.html", b"x".to_vec()).await.unwrap();
        store.put("crawled_documents/u/t/doc2.html", b"y".to_vec()).await.unwrap();
        let keys = store.list("crawled_documents/u/t").await.unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::local(dir.path()).unwrap();
        store.delete(&["does/not/exist.txt".to_string()]).await.unwrap();
    }
}
