use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{ObjectStorage, ObjectStorageError};
use crate::domain::ObjectLocation;

/// `ObjectStorage` over any `object_store` backend bound to one bucket.
pub struct ObjectStoreStorage {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStoreStorage {
    /// S3 bucket; credentials come from the standard `AWS_*` environment.
    pub fn s3(bucket: &str, region: &str) -> Result<Self, ObjectStorageError> {
        let store = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| ObjectStorageError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: bucket.to_string(),
        })
    }

    pub fn in_memory(bucket: &str) -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            bucket: bucket.to_string(),
        }
    }

    pub fn inner(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl ObjectStorage for ObjectStoreStorage {
    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, bytes = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> Result<ObjectLocation, ObjectStorageError> {
        // `parse` keeps the key verbatim; `from` would percent-encode it.
        let store_path =
            StorePath::parse(key).map_err(|e| ObjectStorageError::UploadFailed(e.to_string()))?;
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| ObjectStorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(key = store_path.as_ref(), "Object stored");
        Ok(ObjectLocation::new(self.bucket.clone(), store_path.as_ref()))
    }
}
