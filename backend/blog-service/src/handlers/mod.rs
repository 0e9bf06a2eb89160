/// HTTP handlers for blog-service
///
/// - Auth: register, login, profiles
/// - Posts: list, read, create, edit, delete
/// - Comments and likes
pub mod auth;
pub mod comments;
pub mod form;
pub mod health;
pub mod posts;

pub use auth::{get_profile, get_user_profile, login, register, update_profile};
pub use comments::{add_comment, delete_comment, toggle_like};
pub use health::{health_summary, liveness_check};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
