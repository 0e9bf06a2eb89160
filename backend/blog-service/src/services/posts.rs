/// Post service - posts, comments, likes and post images
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::media::{ImageUpload, MediaStore};
use crate::models::{
    parse_tags, AuthorSummary, CommentView, NewPost, Post, PostChanges, PostDetail, PostSummary,
};
use crate::security::{authorize, Action, Actor};
use std::collections::HashMap;

/// Fields submitted when creating or editing a post
#[derive(Debug, Default, Clone)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Raw comma-separated tags
    pub tags: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    media: Arc<dyn MediaStore>,
    max_upload_bytes: usize,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        media: Arc<dyn MediaStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            posts,
            users,
            media,
            max_upload_bytes,
        }
    }

    pub async fn create_post(&self, author_id: Uuid, form: PostForm) -> Result<PostDetail> {
        authorize(Actor::User(author_id), Action::CreatePost).into_result()?;

        let title = non_empty(form.title)
            .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;
        let content = non_empty(form.content)
            .ok_or_else(|| AppError::Validation("Content is required".to_string()))?;

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(AppError::user_not_found());
        }

        let image = self.upload_image(form.image).await?;
        let post = self
            .posts
            .create(NewPost {
                author_id,
                title,
                content,
                tags: parse_tags(form.tags.as_deref()).unwrap_or_default(),
                image,
            })
            .await?;

        tracing::info!(post_id = %post.id, user_id = %author_id, "post created");
        self.detail(post).await
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let posts = self.posts.list().await?;
        let authors = self.resolve_users(&posts).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostSummary::resolve(post, &authors))
            .collect())
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostDetail> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(AppError::blog_not_found)?;

        self.detail(post).await
    }

    /// Author-only edit. Omitted or empty fields keep their stored value.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        actor: Uuid,
        form: PostForm,
    ) -> Result<PostDetail> {
        // Reject early so a denied edit never uploads an image
        let current = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(AppError::blog_not_found)?;
        authorize(
            Actor::User(actor),
            Action::UpdatePost {
                author: current.author_id,
            },
        )
        .into_result()?;

        let changes = PostChanges {
            title: non_empty(form.title),
            content: non_empty(form.content),
            tags: parse_tags(form.tags.as_deref()),
            image: self.upload_image(form.image).await?,
        };

        let post = self.posts.update(post_id, actor, changes).await?;

        tracing::info!(post_id = %post_id, user_id = %actor, "post updated");
        self.detail(post).await
    }

    pub async fn delete_post(&self, post_id: Uuid, actor: Uuid) -> Result<()> {
        self.posts.delete(post_id, actor).await?;

        tracing::info!(post_id = %post_id, user_id = %actor, "post deleted");
        Ok(())
    }

    /// Append a comment, returning the post's comments with authors resolved
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        actor: Uuid,
        content: String,
    ) -> Result<Vec<CommentView>> {
        if content.is_empty() {
            return Err(AppError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        let comments = self.posts.add_comment(post_id, actor, content).await?;
        tracing::info!(post_id = %post_id, user_id = %actor, "comment added");

        let ids: Vec<Uuid> = comments
            .iter()
            .map(|c| c.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users = self.users.find_authors(&ids).await?;

        Ok(comments
            .iter()
            .map(|c| CommentView::resolve(c, &users))
            .collect())
    }

    pub async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, actor: Uuid) -> Result<()> {
        self.posts.delete_comment(post_id, comment_id, actor).await?;

        tracing::info!(
            post_id = %post_id,
            comment_id = %comment_id,
            user_id = %actor,
            "comment deleted"
        );
        Ok(())
    }

    /// Flip the actor's like, returning the new like count
    pub async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<usize> {
        let like_count = self.posts.toggle_like(post_id, actor).await?;

        tracing::info!(post_id = %post_id, user_id = %actor, like_count, "like toggled");
        Ok(like_count)
    }

    async fn upload_image(&self, image: Option<ImageUpload>) -> Result<Option<String>> {
        let Some(image) = image else {
            return Ok(None);
        };

        let validated = image.validate(self.max_upload_bytes)?;
        let url = self.media.upload(validated).await?;
        Ok(Some(url))
    }

    async fn detail(&self, post: Post) -> Result<PostDetail> {
        let users = self.resolve_users(std::slice::from_ref(&post)).await?;
        Ok(PostDetail::resolve(post, &users))
    }

    /// Authors and commenters of the given posts
    async fn resolve_users(&self, posts: &[Post]) -> Result<HashMap<Uuid, AuthorSummary>> {
        let ids: HashSet<Uuid> = posts
            .iter()
            .flat_map(|p| std::iter::once(p.author_id).chain(p.comments.iter().map(|c| c.user_id)))
            .collect();
        let ids: Vec<Uuid> = ids.into_iter().collect();

        self.users.find_authors(&ids).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
