/// Data models for blog-service
///
/// - `user`: stored users, auth request/response bodies
/// - `post`: the post aggregate (comments and likes) and its read models
pub mod post;
pub mod user;

pub use post::{
    parse_tags, AuthorSummary, Comment, CommentView, NewPost, Post, PostChanges, PostDetail,
    PostSummary,
};
pub use user::{
    default_avatar, AuthResponse, LoginRequest, NewUser, ProfileChanges, ProfileSummary,
    ProfileUpdated, RegisterRequest, UpdateProfileRequest, User, UserProfile,
};

use serde::Serialize;

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
