/// S3-backed media store
use async_trait::async_trait;
use s3_utils::{S3Client, S3Operations};

use super::{MediaError, MediaStore, ValidatedImage};

#[derive(Clone)]
pub struct S3MediaStore {
    operations: S3Operations,
}

impl S3MediaStore {
    pub fn new(client: &S3Client) -> Self {
        Self {
            operations: client.operations(),
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, image: ValidatedImage) -> Result<String, MediaError> {
        self.operations
            .upload_file(image.extension, image.bytes, image.content_type)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))
    }
}
