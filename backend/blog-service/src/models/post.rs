/// Post aggregate
///
/// A post owns its comments (ordered by insertion) and its likes (a set of
/// user ids). Authors and commenters are referenced by id and resolved to
/// [`AuthorSummary`] values when read models are built.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            title: new_post.title,
            content: new_post.content,
            image: new_post.image,
            tags: new_post.tags,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Append a comment with a fresh id
    pub fn push_comment(&mut self, user_id: Uuid, content: String) -> &Comment {
        let index = self.comments.len();
        self.comments.push(Comment {
            id: Uuid::new_v4(),
            user_id,
            content,
            created_at: Utc::now(),
        });
        &self.comments[index]
    }

    /// Remove a comment keeping the relative order of the rest
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }

    /// Add `user_id` to the likes if absent, remove it if present.
    /// Returns the like count afterwards.
    pub fn toggle_like(&mut self, user_id: Uuid) -> usize {
        match self.likes.iter().position(|id| *id == user_id) {
            Some(index) => {
                self.likes.remove(index);
            }
            None => self.likes.push(user_id),
        }
        self.likes.len()
    }
}

/// Fields for a new post. Tags are already parsed.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Partial post update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(image) = self.image {
            post.image = Some(image);
        }
        post.updated_at = Utc::now();
    }
}

/// Split a comma-separated tag field.
///
/// Entries are kept exactly as written: no trimming, no dedup. An absent or
/// empty field yields `None`.
pub fn parse_tags(raw: Option<&str>) -> Option<Vec<String>> {
    match raw {
        Some(raw) if !raw.is_empty() => Some(raw.split(',').map(str::to_string).collect()),
        _ => None,
    }
}

// ============================================================================
// Read models
// ============================================================================

/// Resolved reference to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub user: Option<AuthorSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post as shown in the list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<AuthorSummary>,
    pub likes: Vec<Uuid>,
    pub like_count: usize,
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post with every comment's author resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<AuthorSummary>,
    pub likes: Vec<Uuid>,
    pub like_count: usize,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn resolve(comment: &Comment, users: &HashMap<Uuid, AuthorSummary>) -> Self {
        Self {
            id: comment.id,
            user: users.get(&comment.user_id).cloned(),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }
}

impl PostSummary {
    pub fn resolve(post: Post, users: &HashMap<Uuid, AuthorSummary>) -> Self {
        Self {
            id: post.id,
            author: users.get(&post.author_id).cloned(),
            like_count: post.likes.len(),
            comment_count: post.comments.len(),
            title: post.title,
            content: post.content,
            image: post.image,
            tags: post.tags,
            likes: post.likes,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl PostDetail {
    pub fn resolve(post: Post, users: &HashMap<Uuid, AuthorSummary>) -> Self {
        Self {
            id: post.id,
            author: users.get(&post.author_id).cloned(),
            like_count: post.likes.len(),
            comments: post
                .comments
                .iter()
                .map(|c| CommentView::resolve(c, users))
                .collect(),
            title: post.title,
            content: post.content,
            image: post.image,
            tags: post.tags,
            likes: post.likes,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
