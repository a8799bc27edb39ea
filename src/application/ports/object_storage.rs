use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::ObjectLocation;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, data: Bytes) -> Result<ObjectLocation, ObjectStorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectStorageError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("storage configuration invalid: {0}")]
    Configuration(String),
}
