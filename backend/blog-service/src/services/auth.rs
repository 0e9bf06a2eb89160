/// Auth service - registration, login and profile management
use crypto_core::TokenIssuer;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{
    default_avatar, AuthResponse, LoginRequest, NewUser, ProfileChanges, ProfileSummary,
    ProfileUpdated, RegisterRequest, UpdateProfileRequest, User, UserProfile,
};
use crate::security::{authorize, hash_password, verify_password, Action, Actor};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            users,
            posts,
            tokens,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        req.validate()?;

        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let user = self
            .users
            .create(NewUser {
                avatar: default_avatar(&req.username),
                password_hash: hash_password(&req.password)?,
                username: req.username,
                email: req.email,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.signed_in(&user)
    }

    /// Exchange email and password for a token
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        verify_password(&req.password, &user.password_hash)?;

        tracing::info!(user_id = %user.id, "user logged in");
        self.signed_in(&user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        Ok(self.load_user(user_id).await?.profile())
    }

    /// Profile plus the number of posts the user has written
    pub async fn profile_summary(&self, user_id: Uuid) -> Result<ProfileSummary> {
        let user = self.load_user(user_id).await?;
        let total_blogs = self.posts.count_by_author(user_id).await?;

        Ok(ProfileSummary {
            user: user.profile(),
            total_blogs,
        })
    }

    /// Update bio and avatar. Omitted fields keep their value; an empty bio
    /// clears it, an empty avatar is ignored.
    pub async fn update_profile(
        &self,
        actor: Uuid,
        owner: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileUpdated> {
        authorize(Actor::User(actor), Action::UpdateProfile { owner }).into_result()?;

        let changes = ProfileChanges {
            bio: req.bio,
            avatar: req.avatar.filter(|a| !a.is_empty()),
        };
        let user = self.users.update_profile(owner, changes).await?;

        tracing::info!(user_id = %user.id, "profile updated");
        Ok(ProfileUpdated {
            message: "Profile updated successfully".to_string(),
            bio: user.bio,
            avatar: user.avatar,
        })
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }

    fn signed_in(&self, user: &User) -> Result<AuthResponse> {
        Ok(AuthResponse {
            user: user.profile(),
            token: self.tokens.issue(user.id)?,
        })
    }
}
