//! Bearer session tokens
//!
//! Tokens are HS256 JWTs carrying the subject (user id), the issue time and an
//! expiry fixed at seven days after issuance.
//!
//! ## Key handling
//!
//! The signing secret is passed in when the issuer is constructed. There is no
//! process-wide key storage: every service (and every test) owns its own
//! `TokenIssuer`, usually behind an `Arc` in application state.
//!
//! ```rust
//! use crypto_core::jwt::TokenIssuer;
//! use uuid::Uuid;
//!
//! let issuer = TokenIssuer::new(b"an-example-secret-that-is-long-enough");
//! let user_id = Uuid::new_v4();
//! let token = issuer.issue(user_id).unwrap();
//! assert_eq!(issuer.verify(&token).unwrap(), user_id);
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Session lifetime
pub const TOKEN_EXPIRY_DAYS: i64 = 7;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token verification and signing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

// ============================================================================
// Issuer
// ============================================================================

/// Mints and validates session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &JWT_ALGORITHM)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer with the standard seven day lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(TOKEN_EXPIRY_DAYS))
    }

    /// Create an issuer with a custom token lifetime.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiry, returning the decoded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => {
                    tracing::debug!(error = %e, "rejecting malformed token");
                    TokenError::Malformed
                }
            })
    }

    /// Validate a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Malformed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret-with-enough-entropy-0123";

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id).expect("should issue token");
        assert_eq!(token.matches('.').count(), 2); // JWT has 3 parts
        assert_eq!(issuer.verify(&token), Ok(user_id));
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        let claims = issuer.decode(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
        assert_eq!(issuer.ttl_secs(), 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let issued_at = Utc::now() - Duration::days(8);
        let token = issuer.issue_at(Uuid::new_v4(), issued_at).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let other = TokenIssuer::new(b"a-completely-different-signing-secret!!");
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let issuer = TokenIssuer::new(SECRET);

        assert_eq!(issuer.verify("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(issuer.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let issuer = TokenIssuer::new(SECRET);
        let rendered = format!("{:?}", issuer);

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("unit-test-secret"));
    }
}
