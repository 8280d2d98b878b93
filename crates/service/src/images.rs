use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::objects::{ObjectError, ObjectStore};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image {0} not found")]
    NotFound(String),
    #[error("image url {0} does not belong to this bucket")]
    ForeignUrl(String),
    #[error("object store error: {0}")]
    Store(String),
}

impl From<ObjectError> for ImageError {
    fn from(e: ObjectError) -> Self {
        match e {
            ObjectError::NotFound { key, .. } => Self::NotFound(key),
            other => Self::Store(other.to_string()),
        }
    }
}

/// A freshly stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Generated upload key, unique per upload.
    pub key: String,
    /// Object name inside the bucket, `<owner>/<key>`.
    pub object: String,
}

/// Stores images in one bucket of an [`ObjectStore`] and names them by
/// `<bucket>/<owner id>/<key>` URLs.
pub struct ImageManager {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ImageManager {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self { store, bucket: bucket.into() }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self, raw), fields(bucket = %self.bucket, size = raw.len()))]
    pub async fn upload(&self, owner_id: &str, raw: Bytes) -> Result<Image, ImageError> {
        let key = Uuid::new_v4().to_string();
        let object = format!("{owner_id}/{key}");
        self.store.put(&self.bucket, &object, raw).await?;
        info!(%object, "image stored");
        Ok(Image { key, object })
    }

    /// URL recorded on the owning record.
    pub fn url_for(&self, owner_id: &str, image: &Image) -> String {
        self.url(owner_id, &image.key)
    }

    pub fn url(&self, owner_id: &str, key: &str) -> String {
        format!("{}/{}/{}", self.bucket, owner_id, key)
    }

    pub async fn get_image(&self, object: &str) -> Result<Bytes, ImageError> {
        Ok(self.store.get(&self.bucket, object).await?)
    }

    /// Fetch every image behind a record's URL list, in order.
    pub async fn get_images(&self, urls: &[String]) -> Result<Vec<Bytes>, ImageError> {
        let prefix = format!("{}/", self.bucket);
        let mut out = Vec::with_capacity(urls.len());
        for url in urls {
            let object = url.strip_prefix(&prefix).ok_or_else(|| ImageError::ForeignUrl(url.clone()))?;
            out.push(self.get_image(object).await?);
        }
        Ok(out)
    }
}
