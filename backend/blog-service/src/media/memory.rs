/// In-memory media store for development and tests
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{MediaError, MediaStore, ValidatedImage};

pub struct MemoryMediaStore {
    base_url: String,
    folder: String,
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryMediaStore {
    pub fn new(base_url: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            folder: folder.into(),
            objects: DashMap::new(),
        }
    }

    /// Stored bytes for a key
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new("memory://media", "blogverse")
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, image: ValidatedImage) -> Result<String, MediaError> {
        let key = format!("{}/{}.{}", self.folder, Uuid::new_v4(), image.extension);
        self.objects.insert(key.clone(), image.bytes);
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageUpload;

    #[tokio::test]
    async fn test_upload_stores_under_folder() {
        let store = MemoryMediaStore::default();
        let image = ImageUpload {
            filename: "cover.png".into(),
            bytes: vec![1, 2, 3],
        }
        .validate(1024)
        .unwrap();

        let url = store.upload(image).await.unwrap();
        assert!(url.starts_with("memory://media/blogverse/"));
        assert!(url.ends_with(".png"));

        let key = url.trim_start_matches("memory://media/");
        assert_eq!(store.object(key), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }
}
