/// Integration tests for crypto-core token handling
///
/// Exercises the public API the way the blog service uses it: one issuer per
/// process built from configuration, tokens passed around as opaque strings.
use chrono::{Duration, Utc};
use crypto_core::{validate_secret_strength, SecretStrength, TokenError, TokenIssuer};
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret-9f2c7a1e4b8d6035";

#[test]
fn test_issuers_sharing_a_secret_interoperate() {
    let signer = TokenIssuer::new(TEST_SECRET.as_bytes());
    let verifier = TokenIssuer::new(TEST_SECRET.as_bytes());

    let user_id = Uuid::new_v4();
    let token = signer.issue(user_id).expect("should issue token");

    assert_eq!(verifier.verify(&token), Ok(user_id));
}

#[test]
fn test_tampered_payload_rejected() {
    let issuer = TokenIssuer::new(TEST_SECRET.as_bytes());
    let token = issuer.issue(Uuid::new_v4()).unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let other = issuer.issue(Uuid::new_v4()).unwrap();
    parts[1] = other.split('.').nth(1).unwrap().to_string();
    let spliced = parts.join(".");

    assert_eq!(issuer.verify(&spliced), Err(TokenError::InvalidSignature));
}

#[test]
fn test_token_still_valid_just_before_expiry() {
    let issuer = TokenIssuer::new(TEST_SECRET.as_bytes());
    let issued_at = Utc::now() - Duration::days(7) + Duration::minutes(5);
    let user_id = Uuid::new_v4();
    let token = issuer.issue_at(user_id, issued_at).unwrap();

    assert_eq!(issuer.verify(&token), Ok(user_id));
}

#[test]
fn test_token_rejected_just_after_expiry() {
    let issuer = TokenIssuer::new(TEST_SECRET.as_bytes());
    let issued_at = Utc::now() - Duration::days(7) - Duration::minutes(5);
    let token = issuer.issue_at(Uuid::new_v4(), issued_at).unwrap();

    assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_short_ttl_issuer() {
    let issuer = TokenIssuer::with_ttl(TEST_SECRET.as_bytes(), Duration::seconds(-10));
    let token = issuer.issue(Uuid::new_v4()).unwrap();

    assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_test_secret_is_acceptable() {
    assert_ne!(validate_secret_strength(TEST_SECRET), SecretStrength::Weak);
}
