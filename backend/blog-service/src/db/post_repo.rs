/// PostgreSQL post aggregate store
///
/// Posts live in `posts`; comments in `post_comments` ordered by their
/// `seq` column; likes in `post_likes` keyed by `(post_id, user_id)`. Child
/// rows cascade when the post is deleted.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use super::PostStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, NewPost, Post, PostChanges};
use crate::security::{authorize, Action, Actor};

const POST_COLUMNS: &str = "id, author_id, title, content, image, tags, created_at, updated_at";

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    image: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, likes: Vec<Uuid>, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            image: self.image,
            tags: self.tags,
            likes,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LikeRow {
    post_id: Uuid,
    user_id: Uuid,
}

/// Lock a post row for the rest of the transaction
async fn lock_post(conn: &mut PgConnection, id: Uuid) -> Result<PostRow> {
    let query = format!("SELECT {} FROM posts WHERE id = $1 FOR UPDATE", POST_COLUMNS);

    sqlx::query_as::<_, PostRow>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(AppError::blog_not_found)
}

async fn load_comments(conn: &mut PgConnection, post_ids: &[Uuid]) -> Result<Vec<CommentRow>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, post_id, user_id, content, created_at
        FROM post_comments
        WHERE post_id = ANY($1)
        ORDER BY seq ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

async fn load_likes(conn: &mut PgConnection, post_ids: &[Uuid]) -> Result<Vec<LikeRow>> {
    let rows = sqlx::query_as::<_, LikeRow>(
        r#"
        SELECT post_id, user_id
        FROM post_likes
        WHERE post_id = ANY($1)
        ORDER BY created_at ASC, user_id ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

/// Attach comments and likes to post rows, keeping row order
async fn assemble(conn: &mut PgConnection, rows: Vec<PostRow>) -> Result<Vec<Post>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for row in load_comments(&mut *conn, &ids).await? {
        comments.entry(row.post_id).or_default().push(row.into());
    }

    let mut likes: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in load_likes(&mut *conn, &ids).await? {
        likes.entry(row.post_id).or_default().push(row.user_id);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let post_likes = likes.remove(&row.id).unwrap_or_default();
            let post_comments = comments.remove(&row.id).unwrap_or_default();
            row.into_post(post_likes, post_comments)
        })
        .collect())
}

async fn assemble_one(conn: &mut PgConnection, row: PostRow) -> Result<Post> {
    assemble(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(AppError::blog_not_found)
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let query = format!(
            r#"
            INSERT INTO posts (id, author_id, title, content, image, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(Uuid::new_v4())
            .bind(new_post.author_id)
            .bind(&new_post.title)
            .bind(&new_post.content)
            .bind(&new_post.image)
            .bind(&new_post.tags)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::user_not_found()
                }
                other => other.into(),
            })?;

        Ok(row.into_post(Vec::new(), Vec::new()))
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let mut conn = self.pool.acquire().await?;
        let query = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&query)
            .fetch_all(&mut *conn)
            .await?;

        assemble(&mut conn, rows).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        let mut conn = self.pool.acquire().await?;
        let query = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Some(assemble_one(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, actor: Uuid, changes: PostChanges) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let current = lock_post(&mut tx, id).await?;
        authorize(
            Actor::User(actor),
            Action::UpdatePost {
                author: current.author_id,
            },
        )
        .into_result()?;

        let query = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                tags = COALESCE($4, tags),
                image = COALESCE($5, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.tags)
            .bind(changes.image)
            .fetch_one(&mut *tx)
            .await?;

        let post = assemble_one(&mut tx, row).await?;
        tx.commit().await?;

        Ok(post)
    }

    async fn delete(&self, id: Uuid, actor: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current = lock_post(&mut tx, id).await?;
        authorize(
            Actor::User(actor),
            Action::DeletePost {
                author: current.author_id,
            },
        )
        .into_result()?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        actor: Uuid,
        content: String,
    ) -> Result<Vec<Comment>> {
        let mut tx = self.pool.begin().await?;

        lock_post(&mut tx, post_id).await?;
        authorize(Actor::User(actor), Action::AddComment).into_result()?;

        sqlx::query(
            r#"
            INSERT INTO post_comments (id, post_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(actor)
        .bind(&content)
        .execute(&mut *tx)
        .await?;

        let comments = load_comments(&mut tx, &[post_id])
            .await?
            .into_iter()
            .map(Comment::from)
            .collect();

        tx.commit().await?;
        Ok(comments)
    }

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, actor: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let post = lock_post(&mut tx, post_id).await?;

        let comment_author: Uuid = sqlx::query_scalar(
            "SELECT user_id FROM post_comments WHERE id = $1 AND post_id = $2",
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(AppError::comment_not_found)?;

        authorize(
            Actor::User(actor),
            Action::DeleteComment {
                comment_author,
                post_author: post.author_id,
            },
        )
        .into_result()?;

        sqlx::query("DELETE FROM post_comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        lock_post(&mut tx, post_id).await?;
        authorize(Actor::User(actor), Action::ToggleLike).into_result()?;

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(actor)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(actor)
                .execute(&mut *tx)
                .await?;
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(count as usize)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
