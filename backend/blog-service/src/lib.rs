/// Blog Service Library
///
/// REST backend for a multi-user blog: accounts with bearer tokens, posts
/// with an optional image, comments and likes.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table under `/api`
/// - `models`: users, posts and their read models
/// - `services`: business logic layer
/// - `db`: credential and post stores (PostgreSQL or in-memory)
/// - `media`: image validation and upload
/// - `security`: password hashing and the authorization guard
/// - `middleware`: bearer token resolution
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use crypto_core::TokenIssuer;
use std::sync::Arc;

use crate::db::memory::{MemoryPostStore, MemoryUserStore};
use crate::db::{PostStore, UserStore};
use crate::media::memory::MemoryMediaStore;
use crate::media::MediaStore;
use crate::services::{AuthService, PostService};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub user_store: Arc<dyn UserStore>,
    pub post_store: Arc<dyn PostStore>,
    pub tokens: Arc<TokenIssuer>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        post_store: Arc<dyn PostStore>,
        media: Arc<dyn MediaStore>,
        tokens: Arc<TokenIssuer>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            auth: AuthService::new(user_store.clone(), post_store.clone(), tokens.clone()),
            posts: PostService::new(
                post_store.clone(),
                user_store.clone(),
                media,
                max_upload_bytes,
            ),
            user_store,
            post_store,
            tokens,
            max_upload_bytes,
        }
    }

    /// Fully in-process state: memory stores and memory media
    pub fn in_memory(jwt_secret: &[u8], max_upload_bytes: usize) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryPostStore::new()),
            Arc::new(MemoryMediaStore::default()),
            Arc::new(TokenIssuer::new(jwt_secret)),
            max_upload_bytes,
        )
    }
}
