/// Health endpoints
use actix_web::{web, HttpResponse};

use crate::AppState;

/// Store reachability
pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    let result = match state.user_store.ping().await {
        Ok(()) => state.post_store.ping().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "blog-service"
            }))
        }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
