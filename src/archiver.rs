// Archiver: writes one finalized archive to its partition path. No retry, no cleanup.

use crate::encoder::EncodedArchive;
use crate::error::ArchiveError;
use crate::key::ArchiveKey;
use crate::ports::ObjectStore;
use tracing::info;

pub struct Archiver<'a> {
    store: &'a dyn ObjectStore,
    bucket: String,
}

impl<'a> Archiver<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub async fn upload(&self, key: &ArchiveKey, archive: EncodedArchive) -> Result<(), ArchiveError> {
        let path = key.path();
        let size = archive.bytes.len();
        self.store
            .put_object(&self.bucket, &path, archive.bytes)
            .await
            .map_err(|e| ArchiveError::Upload {
                bucket: self.bucket.clone(),
                key: path.clone(),
                source: e.into(),
            })?;
        info!(
            operation = "put_object",
            bucket = %self.bucket,
            key = %path,
            bytes = size,
            records = archive.records,
            "archive uploaded"
        );
        Ok(())
    }
}
