/// Persistence layer
///
/// Stores are reached through the [`UserStore`] and [`PostStore`] traits so
/// the service can run against PostgreSQL or the in-memory backend.
///
/// Post mutations take the acting user and run the authorization guard
/// inside the same atomic unit as the write: a row lock in a transaction
/// for PostgreSQL, the map entry lock in memory. Missing posts or comments
/// are reported before permission is checked.
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuthorSummary, Comment, NewPost, NewUser, Post, PostChanges, ProfileChanges, User};

pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::{MemoryPostStore, MemoryUserStore};
pub use post_repo::PgPostStore;
pub use user_repo::PgUserStore;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; fails with `DuplicateEmail` if the email is taken
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Resolve author summaries for a set of ids; unknown ids are skipped
    async fn find_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorSummary>>;

    /// Apply a partial profile update; fails with `NotFound` for unknown ids
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User>;

    async fn ping(&self) -> Result<()>;
}

/// Post aggregate store
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, new_post: NewPost) -> Result<Post>;

    /// All posts, newest first (ties broken by id, descending)
    async fn list(&self) -> Result<Vec<Post>>;

    async fn get(&self, id: Uuid) -> Result<Option<Post>>;

    /// Author-only partial update
    async fn update(&self, id: Uuid, actor: Uuid, changes: PostChanges) -> Result<Post>;

    /// Author-only delete; comments and likes go with the post
    async fn delete(&self, id: Uuid, actor: Uuid) -> Result<()>;

    /// Append a comment, returning the post's full comment list
    async fn add_comment(&self, post_id: Uuid, actor: Uuid, content: String)
        -> Result<Vec<Comment>>;

    /// Remove a comment; allowed for the commenter and the post author
    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, actor: Uuid) -> Result<()>;

    /// Flip the actor's like, returning the like count afterwards
    async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<usize>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64>;

    async fn ping(&self) -> Result<()>;
}

/// Newest first, ties broken by id
pub(crate) fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Emails are compared case-insensitively
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
