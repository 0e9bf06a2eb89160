/// Comment and like handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{CommentView, MessageResponse};
use crate::AppState;

/// Request body for adding a comment
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub message: String,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub like_count: usize,
}

/// Add a comment to a post
pub async fn add_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comments = state
        .posts
        .add_comment(*post_id, user_id.0, req.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(CommentsResponse {
        message: "Comment added".to_string(),
        comments,
    }))
}

/// Delete a comment; allowed for its author and the post's author
pub async fn delete_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .posts
        .delete_comment(post_id, comment_id, user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}

/// Like the post, or take the like back
pub async fn toggle_like(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let like_count = state.posts.toggle_like(*post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(LikeResponse {
        message: "Toggled like".to_string(),
        like_count,
    }))
}
