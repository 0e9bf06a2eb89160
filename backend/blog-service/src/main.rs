use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::config::{MediaBackend, StorageBackend};
use blog_service::db::{MemoryPostStore, MemoryUserStore, PgPostStore, PgUserStore, PostStore, UserStore};
use blog_service::media::{MediaStore, MemoryMediaStore, S3MediaStore};
use blog_service::{routes, AppState, Config};
use crypto_core::{validate_secret_strength, SecretStrength, TokenIssuer};
use db_pool::{create_pool, DbConfig};
use s3_utils::S3Client;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    // LOG_FORMAT=json for log shipping, human readable otherwise
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_stores(config: &Config) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn PostStore>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok((
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryPostStore::new()),
            ))
        }
        StorageBackend::Postgres => {
            let db_cfg = DbConfig::new(
                "blog-service",
                &config.storage.database_url,
                config.storage.max_connections,
            );
            db_cfg.log_config();

            let pool = create_pool(db_cfg)
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok((
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgPostStore::new(pool)),
            ))
        }
    }
}

async fn build_media(config: &Config) -> Arc<dyn MediaStore> {
    match config.media.backend {
        MediaBackend::Memory => {
            tracing::warn!("Using in-memory media store; uploads are not persisted");
            Arc::new(MemoryMediaStore::default())
        }
        MediaBackend::S3 => {
            let client = S3Client::with_config(config.media.s3.clone()).await;
            tracing::info!(bucket = %config.media.s3.bucket, "S3 media store configured");
            Arc::new(S3MediaStore::new(&client))
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Blog Service
///
/// Serves accounts, posts, comments and likes over HTTP.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // weak secrets are already rejected at load time in production
    if !config.is_production()
        && validate_secret_strength(&config.auth.jwt_secret) == SecretStrength::Weak
    {
        tracing::warn!("JWT_SECRET is weak; acceptable for development only");
    }

    let (user_store, post_store) = build_stores(&config).await?;
    let media = build_media(&config).await;
    let tokens = Arc::new(TokenIssuer::new(config.auth.jwt_secret.as_bytes()));

    let state = web::Data::new(AppState::new(
        user_store,
        post_store,
        media,
        tokens,
        config.media.max_upload_bytes,
    ));

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    let handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            handle.stop(true).await;
            server_task
                .await
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
    }

    tracing::info!("blog-service shutting down");
    Ok(())
}
