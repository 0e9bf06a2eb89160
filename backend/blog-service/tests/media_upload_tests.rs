//! Post image handling against a mocked media store

use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;

use blog_service::db::{MemoryPostStore, MemoryUserStore};
use blog_service::media::{ImageUpload, MediaError, MediaStore, ValidatedImage};
use blog_service::models::RegisterRequest;
use blog_service::services::PostForm;
use blog_service::{AppError, AppState};
use crypto_core::TokenIssuer;

mock! {
    pub Media {}

    #[async_trait]
    impl MediaStore for Media {
        async fn upload(&self, image: ValidatedImage) -> Result<String, MediaError>;
    }
}

const MAX_UPLOAD: usize = 1024;

fn state_with(media: MockMedia) -> AppState {
    AppState::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryPostStore::new()),
        Arc::new(media),
        Arc::new(TokenIssuer::new(b"media-upload-test-secret-0123456789abcdef")),
        MAX_UPLOAD,
    )
}

async fn register(state: &AppState, name: &str) -> uuid::Uuid {
    state
        .auth
        .register(RegisterRequest {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password: "password123".to_string(),
        })
        .await
        .expect("register")
        .user
        .id
}

fn form_with_image(filename: &str) -> PostForm {
    PostForm {
        title: Some("With image".to_string()),
        content: Some("Body".to_string()),
        tags: None,
        image: Some(ImageUpload {
            filename: filename.to_string(),
            bytes: vec![7; 16],
        }),
    }
}

#[tokio::test]
async fn test_uploaded_url_is_stored_on_post() {
    let mut media = MockMedia::new();
    media
        .expect_upload()
        .withf(|image| image.extension == "webp" && image.content_type == "image/webp")
        .times(1)
        .returning(|_| Ok("https://cdn.example.com/blogverse/abc.webp".to_string()));

    let state = state_with(media);
    let author = register(&state, "olivia").await;

    let post = state
        .posts
        .create_post(author, form_with_image("photo.webp"))
        .await
        .expect("create post");

    assert_eq!(
        post.image.as_deref(),
        Some("https://cdn.example.com/blogverse/abc.webp")
    );
}

#[tokio::test]
async fn test_upload_failure_creates_nothing() {
    let mut media = MockMedia::new();
    media
        .expect_upload()
        .times(1)
        .returning(|_| Err(MediaError::Upload("bucket unreachable".to_string())));

    let state = state_with(media);
    let author = register(&state, "peggy").await;

    let err = state
        .posts
        .create_post(author, form_with_image("photo.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let posts = state.posts.list_posts().await.expect("list");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_rejected_image_never_reaches_store() {
    let mut media = MockMedia::new();
    media.expect_upload().times(0);

    let state = state_with(media);
    let author = register(&state, "quentin").await;

    let err = state
        .posts
        .create_post(author, form_with_image("script.svg"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut oversized = form_with_image("large.png");
    if let Some(image) = oversized.image.as_mut() {
        image.bytes = vec![0; MAX_UPLOAD + 1];
    }
    let err = state.posts.create_post(author, oversized).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_denied_edit_does_not_upload() {
    let mut media = MockMedia::new();
    media.expect_upload().times(0);

    let state = state_with(media);
    let author = register(&state, "rupert").await;
    let stranger = register(&state, "sybil").await;

    let post = state
        .posts
        .create_post(
            author,
            PostForm {
                title: Some("Mine".to_string()),
                content: Some("Hands off".to_string()),
                ..PostForm::default()
            },
        )
        .await
        .expect("create post");

    let err = state
        .posts
        .update_post(post.id, stranger, form_with_image("swap.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}
