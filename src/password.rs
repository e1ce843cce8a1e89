//! Salted password hashing (bcrypt).

use crate::error::AppError;

/// bcrypt cost factor (log2 rounds).
pub const SALT_ROUNDS: u32 = 10;

/// bcrypt only reads this many bytes; longer passwords would share a hash with their prefix.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, SALT_ROUNDS)
}

/// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected rather than truncated.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(bcrypt::hash(password, cost)?)
}

/// Compare a candidate password with a stored hash. A malformed hash never matches.
pub fn compare_password(password: &str, hashed_password: &str) -> bool {
    bcrypt::verify(password, hashed_password).unwrap_or(false)
}

/// [`hash_password`] on the blocking pool, for use from request handlers.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hash task: {}", e)))?
}

/// [`compare_password`] on the blocking pool.
pub async fn compare_password_blocking(password: String, hashed_password: String) -> bool {
    tokio::task::spawn_blocking(move || compare_password(&password, &hashed_password))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_compare() {
        for password in ["hunter22", "", "비밀번호-with-unicode", "a much longer pass phrase with spaces"] {
            let hashed = hash_password(password).unwrap();
            assert_ne!(hashed, password);
            assert!(compare_password(password, &hashed), "{password:?}");
        }
    }

    #[test]
    fn different_password_does_not_match() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(!compare_password("correct horse ", &hashed));
        assert!(!compare_password("Correct horse", &hashed));
    }

    #[test]
    fn passwords_past_bcrypt_limit_are_rejected() {
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(compare_password(&at_limit, &hash_password(&at_limit).unwrap()));

        let first = format!("{}first", at_limit);
        assert!(matches!(hash_password(&first), Err(AppError::Validation(_))));
        // Multi-byte characters count by bytes.
        assert!(hash_password(&"가".repeat(25)).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$2b$10$"));
    }

    #[test]
    fn malformed_hash_is_false() {
        assert!(!compare_password("anything", "not-a-bcrypt-hash"));
        assert!(!compare_password("anything", ""));
    }

    #[tokio::test]
    async fn blocking_variants() {
        let hashed = hash_password_blocking("pw".into()).await.unwrap();
        assert!(compare_password_blocking("pw".into(), hashed.clone()).await);
        assert!(!compare_password_blocking("other".into(), hashed).await);
    }
}
