//! Object store boundary: binary blobs addressed by bucket and key.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};

#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("object store io error: {0}")]
    Io(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), ObjectError>;
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectError>;
}

/// In-process object store.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), ObjectError> {
        self.objects.write().await.insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectError> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ObjectError::NotFound { bucket: bucket.to_string(), key: key.to_string() })
    }
}

/// Local filesystem store laid out as `<root>/<bucket>/<key>`.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, ObjectError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| ObjectError::Io(format!("failed to create storage directory: {e}")))?;
        Ok(Self { root })
    }

    fn path_for(&self, bucket: &str, key: &str) -> Result<PathBuf, ObjectError> {
        for part in [bucket, key] {
            let clean = !part.is_empty()
                && Path::new(part).components().all(|c| matches!(c, Component::Normal(_)));
            if !clean {
                return Err(ObjectError::InvalidKey(format!("{bucket}/{key}")));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), ObjectError> {
        let path = self.path_for(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ObjectError::Io(format!("failed to create directory: {e}")))?;
        }
        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| ObjectError::Io(format!("failed to create file: {e}")))?;
        file.write_all(&data)
            .await
            .map_err(|e| ObjectError::Io(format!("failed to write file: {e}")))?;
        file.flush().await.map_err(|e| ObjectError::Io(e.to_string()))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectError> {
        let path = self.path_for(bucket, key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectError::NotFound { bucket: bucket.to_string(), key: key.to_string() })
            }
            Err(e) => Err(ObjectError::Io(format!("failed to read file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_store_round_trip_and_missing() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("objects_{}", uuid::Uuid::new_v4()));
        let store = LocalObjectStore::new(&root).await?;
        store.put("bucket.example.com", "owner/key", Bytes::from_static(b"png")).await?;
        assert_eq!(store.get("bucket.example.com", "owner/key").await?, Bytes::from_static(b"png"));
        assert!(matches!(
            store.get("bucket.example.com", "owner/other").await,
            Err(ObjectError::NotFound { .. })
        ));
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn local_store_rejects_escaping_keys() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("objects_{}", uuid::Uuid::new_v4()));
        let store = LocalObjectStore::new(&root).await?;
        for key in ["../x", "/etc/passwd", ""] {
            let res = store.put("b", key, Bytes::new()).await;
            assert!(matches!(res, Err(ObjectError::InvalidKey(_))), "{key}");
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_is_keyed_by_bucket() -> Result<(), anyhow::Error> {
        let store = MemoryObjectStore::new();
        store.put("a", "k", Bytes::from_static(b"1")).await?;
        assert!(store.get("b", "k").await.is_err());
        assert_eq!(store.len().await, 1);
        Ok(())
    }
}
