/// Multipart post form parsing
use actix_multipart::Multipart;
use futures_util::stream::StreamExt;

use crate::error::{AppError, Result};
use crate::media::{ImageUpload, MediaError};
use crate::services::PostForm;

/// Text fields are small; anything larger is a malformed request
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// Read `title`, `content`, `tags` and the `image` file from a multipart body.
/// Unknown fields are drained and ignored.
pub async fn read_post_form(mut payload: Multipart, max_image_bytes: usize) -> Result<PostForm> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let limit = if name == "image" {
            max_image_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::Validation(format!("Error reading field '{}': {}", name, e)))?;
            if bytes.len() + chunk.len() > limit {
                return Err(if name == "image" {
                    AppError::from(MediaError::TooLarge { limit })
                } else {
                    AppError::Validation(format!("Field '{}' is too large", name))
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "title" => form.title = Some(into_text(&name, bytes)?),
            "content" => form.content = Some(into_text(&name, bytes)?),
            "tags" => form.tags = Some(into_text(&name, bytes)?),
            "image" => {
                // an empty file input is submitted as a part with no filename
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    form.image = Some(ImageUpload { filename, bytes });
                }
            }
            other => tracing::debug!(field = %other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn into_text(name: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| AppError::Validation(format!("Field '{}' must be UTF-8 text", name)))
}
