//! Signing secret strength checks
//!
//! HS256 is only as strong as the shared secret. Services call
//! [`validate_secret_strength`] at startup and refuse weak secrets in
//! production.

/// 256 bits
pub const MIN_SECRET_LENGTH: usize = 32;

const RECOMMENDED_SECRET_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Too short or trivially patterned - reject in production
    Weak,
    /// Usable, warn
    Acceptable,
    Strong,
}

/// Classify a signing secret.
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH || is_single_repeated_run(bytes) {
        return SecretStrength::Weak;
    }

    let distinct = distinct_bytes(bytes);
    if distinct < 8 {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && distinct >= 16 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

fn is_single_repeated_run(bytes: &[u8]) -> bool {
    bytes.windows(2).all(|w| w[0] == w[1])
}

fn distinct_bytes(bytes: &[u8]) -> usize {
    let mut seen = [false; 256];
    let mut count = 0;
    for &b in bytes {
        if !seen[b as usize] {
            seen[b as usize] = true;
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_weak() {
        assert_eq!(validate_secret_strength("secret"), SecretStrength::Weak);
    }

    #[test]
    fn test_repeated_secret_is_weak() {
        let secret = "a".repeat(80);
        assert_eq!(validate_secret_strength(&secret), SecretStrength::Weak);
    }

    #[test]
    fn test_low_variety_secret_is_weak() {
        let secret = "abab".repeat(10);
        assert_eq!(validate_secret_strength(&secret), SecretStrength::Weak);
    }

    #[test]
    fn test_acceptable_and_strong() {
        assert_eq!(
            validate_secret_strength("k3J9-vQ2x!Lm8#Pz0rT6wY4uE1oN7sA5"),
            SecretStrength::Acceptable
        );
        assert_eq!(
            validate_secret_strength(
                "k3J9-vQ2x!Lm8#Pz0rT6wY4uE1oN7sA5dF8gH2jK4lZ6xC9vB1nM3qW5eR7tY0uI"
            ),
            SecretStrength::Strong
        );
    }
}
