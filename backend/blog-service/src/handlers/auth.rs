/// Auth handlers - registration, login and profile endpoints
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let resp = state.auth.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(resp))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let resp = state.auth.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// GET /api/auth/profile
pub async fn get_profile(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let profile = state.auth.profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/auth/user/profile
pub async fn get_user_profile(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let summary = state.auth.profile_summary(user_id.0).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// PUT /api/auth/update/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let updated = state
        .auth
        .update_profile(user_id.0, user_id.0, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}
