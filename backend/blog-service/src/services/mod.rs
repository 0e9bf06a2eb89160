/// Business logic layer for blog-service
///
/// - Auth service: registration, login, profiles
/// - Post service: posts, comments, likes and image uploads
pub mod auth;
pub mod posts;

pub use auth::AuthService;
pub use posts::{PostForm, PostService};
