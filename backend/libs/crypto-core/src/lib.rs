//! Shared token and secret handling for the blog backend.
//!
//! - `jwt`: bearer session token issuance and verification
//! - `secret`: signing secret strength checks used at startup

pub mod jwt;
pub mod secret;

pub use jwt::{Claims, TokenError, TokenIssuer, TOKEN_EXPIRY_DAYS};
pub use secret::{validate_secret_strength, SecretStrength, MIN_SECRET_LENGTH};
