//! Argon2 password hashing

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a plaintext password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check a plaintext password against a stored hash
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("longpassword1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "longpassword1");
        assert!(verify_password(&hash, "longpassword1"));
        assert!(!verify_password(&hash, "wrongpassword"));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("longpassword1").unwrap(),
            hash_password("longpassword1").unwrap()
        );
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "longpassword1"));
    }
}
