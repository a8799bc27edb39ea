use std::sync::Arc;

use crate::application::ports::{ObjectStorage, ObjectStorageError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_store_storage::ObjectStoreStorage;

pub struct ObjectStorageFactory;

impl ObjectStorageFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ObjectStorage>, ObjectStorageError> {
        match settings.provider {
            StorageProviderSetting::S3 => {
                let store = ObjectStoreStorage::s3(&settings.bucket, &settings.region)?;
                tracing::info!(bucket = %settings.bucket, region = %settings.region, "Using S3 object storage");
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => {
                tracing::info!(bucket = %settings.bucket, "Using in-memory object storage");
                Ok(Arc::new(ObjectStoreStorage::in_memory(&settings.bucket)))
            }
        }
    }
}
