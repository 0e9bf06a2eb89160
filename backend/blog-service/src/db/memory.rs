/// In-memory stores for local development and tests
///
/// Each post is one `DashMap` entry; holding the entry guard serializes
/// mutations of that aggregate. Nothing here awaits while a guard is held.
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use uuid::Uuid;

use super::{normalize_email, sort_newest_first, PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{AuthorSummary, Comment, NewPost, NewUser, Post, PostChanges, ProfileChanges, User};
use crate::security::{authorize, Action, Actor};

#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    /// normalized email -> user id
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let email = normalize_email(&new_user.email);

        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    username: new_user.username,
                    email,
                    password_hash: new_user.password_hash,
                    avatar: new_user.avatar,
                    bio: None,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = match self.emails.get(&normalize_email(email)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| (*id, u.author_summary())))
            .collect())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User> {
        let mut user = self.users.get_mut(&id).ok_or_else(AppError::user_not_found)?;

        if let Some(bio) = changes.bio {
            user.bio = Some(bio).filter(|b| !b.is_empty());
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = avatar;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPostStore {
    posts: DashMap<Uuid, Post>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let post = Post::new(new_post);
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.value().clone()).collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn update(&self, id: Uuid, actor: Uuid, changes: PostChanges) -> Result<Post> {
        let mut post = self.posts.get_mut(&id).ok_or_else(AppError::blog_not_found)?;

        authorize(
            Actor::User(actor),
            Action::UpdatePost {
                author: post.author_id,
            },
        )
        .into_result()?;

        changes.apply(&mut post);
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid, actor: Uuid) -> Result<()> {
        match self.posts.entry(id) {
            Entry::Vacant(_) => Err(AppError::blog_not_found()),
            Entry::Occupied(entry) => {
                authorize(
                    Actor::User(actor),
                    Action::DeletePost {
                        author: entry.get().author_id,
                    },
                )
                .into_result()?;
                entry.remove();
                Ok(())
            }
        }
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        actor: Uuid,
        content: String,
    ) -> Result<Vec<Comment>> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(AppError::blog_not_found)?;

        authorize(Actor::User(actor), Action::AddComment).into_result()?;

        post.push_comment(actor, content);
        Ok(post.comments.clone())
    }

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, actor: Uuid) -> Result<()> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(AppError::blog_not_found)?;

        let comment_author = post
            .comment(comment_id)
            .map(|c| c.user_id)
            .ok_or_else(AppError::comment_not_found)?;

        authorize(
            Actor::User(actor),
            Action::DeleteComment {
                comment_author,
                post_author: post.author_id,
            },
        )
        .into_result()?;

        post.remove_comment(comment_id);
        Ok(())
    }

    async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<usize> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(AppError::blog_not_found)?;

        authorize(Actor::User(actor), Action::ToggleLike).into_result()?;

        Ok(post.toggle_like(actor))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        Ok(self
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as i64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "ada".into(),
            email: email.into(),
            password_hash: "hash".into(),
            avatar: "avatar.svg".into(),
        }
    }

    fn new_post(author_id: Uuid) -> NewPost {
        NewPost {
            author_id,
            title: "Title".into(),
            content: "Body".into(),
            tags: vec![],
            image: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.create(new_user("ada@example.com")).await.unwrap();

        let err = store.create(new_user("ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_update_is_partial() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();

        let updated = store
            .update_profile(
                user.id,
                ProfileChanges {
                    bio: Some("Mathematician".into()),
                    avatar: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.bio.as_deref(), Some("Mathematician"));
        assert_eq!(updated.avatar, "avatar.svg");

        let cleared = store
            .update_profile(
                user.id,
                ProfileChanges {
                    bio: Some(String::new()),
                    avatar: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.bio, None);
        assert_eq!(cleared.avatar, "avatar.svg");
    }

    #[tokio::test]
    async fn test_not_found_before_forbidden() {
        let store = MemoryPostStore::new();
        let stranger = Uuid::new_v4();

        let err = store.delete(Uuid::new_v4(), stranger).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let post = store.create(new_post(Uuid::new_v4())).await.unwrap();
        let err = store
            .delete_comment(post.id, Uuid::new_v4(), stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Comment not found"));
    }

    #[tokio::test]
    async fn test_only_author_deletes() {
        let store = MemoryPostStore::new();
        let author = Uuid::new_v4();
        let post = store.create(new_post(author)).await.unwrap();

        let err = store.delete(post.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(store.get(post.id).await.unwrap().is_some());

        store.delete(post.id, author).await.unwrap();
        assert!(store.get(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let store = std::sync::Arc::new(MemoryPostStore::new());
        let post = store.create(new_post(Uuid::new_v4())).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.toggle_like(post.id, Uuid::new_v4()).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let post = store.get(post.id).await.unwrap().unwrap();
        assert_eq!(post.likes.len(), 32);
    }

    #[tokio::test]
    async fn test_count_by_author() {
        let store = MemoryPostStore::new();
        let author = Uuid::new_v4();
        store.create(new_post(author)).await.unwrap();
        store.create(new_post(author)).await.unwrap();
        store.create(new_post(Uuid::new_v4())).await.unwrap();

        assert_eq!(store.count_by_author(author).await.unwrap(), 2);
    }
}
