/// Post image storage
///
/// Images arrive as multipart uploads, are checked against the allowed
/// formats and size limit, and are stored under the media folder. The
/// store returns the public URL that ends up on the post.
use async_trait::async_trait;

pub mod memory;
pub mod s3;

pub use memory::MemoryMediaStore;
pub use s3::S3MediaStore;

/// Extensions accepted for post images
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported image format '{0}'; allowed: jpg, jpeg, png, webp")]
    UnsupportedFormat(String),

    #[error("Image exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("Image upload failed: {0}")]
    Upload(String),
}

/// An image file read from a request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Image that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub extension: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check format and size
    pub fn validate(self, max_bytes: usize) -> Result<ValidatedImage, MediaError> {
        let extension = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let extension = ALLOWED_EXTENSIONS
            .iter()
            .copied()
            .find(|allowed| *allowed == extension)
            .ok_or(MediaError::UnsupportedFormat(extension))?;

        if self.bytes.len() > max_bytes {
            return Err(MediaError::TooLarge { limit: max_bytes });
        }

        Ok(ValidatedImage {
            extension,
            content_type: content_type_for(extension),
            bytes: self.bytes,
        })
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an image, returning its public URL
    async fn upload(&self, image: ValidatedImage) -> Result<String, MediaError>;
}
