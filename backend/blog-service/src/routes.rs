use actix_web::web;

use crate::error::AppError;
use crate::handlers;
use crate::middleware::IdentityMiddleware;

/// Mount every endpoint under `/api`.
///
/// Malformed JSON bodies answer 400 and unparsable path ids answer 404,
/// both in the usual `{"message", "status"}` shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".to_string()).into()),
    )
    .service(
        web::scope("/api")
            .wrap(IdentityMiddleware)
            .route("/health", web::get().to(handlers::health_summary))
            .route("/health/live", web::get().to(handlers::liveness_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/profile", web::get().to(handlers::get_profile))
                    .route("/user/profile", web::get().to(handlers::get_user_profile))
                    .route("/update/profile", web::put().to(handlers::update_profile)),
            )
            .service(
                web::scope("/blogs")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::list_posts))
                            .route(web::post().to(handlers::create_post)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::put().to(handlers::update_post))
                            .route(web::delete().to(handlers::delete_post)),
                    )
                    .route("/{id}/comments", web::post().to(handlers::add_comment))
                    .route(
                        "/{blog_id}/comments/{comment_id}",
                        web::delete().to(handlers::delete_comment),
                    )
                    .route("/{id}/like", web::post().to(handlers::toggle_like)),
            ),
    );
}
