/// Post handlers - HTTP endpoints for post operations
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::form::read_post_form;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::MessageResponse;
use crate::AppState;

/// List all posts, newest first
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post with its author and comments
pub async fn get_post(state: web::Data<AppState>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = state.posts.get_post(*post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a post from a multipart form
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;
    let post = state.posts.create_post(user_id.0, form).await?;

    Ok(HttpResponse::Created().json(post))
}

/// Edit a post; only the author may do this
pub async fn update_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;
    let post = state.posts.update_post(*post_id, user_id.0, form).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post along with its comments and likes
pub async fn delete_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete_post(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted")))
}
