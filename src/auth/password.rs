use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

/// Policy applied before any hashing happens: at least 8 characters with a
/// digit, a lowercase letter, an uppercase letter and one of `!@#$%^&*`.
pub fn is_strong(password: &str) -> bool {
    lazy_static! {
        static ref HAS_DIGIT: Regex = Regex::new(r"\d").unwrap();
        static ref HAS_LOWER: Regex = Regex::new(r"[a-z]").unwrap();
        static ref HAS_UPPER: Regex = Regex::new(r"[A-Z]").unwrap();
        static ref HAS_SYMBOL: Regex = Regex::new(r"[!@#$%^&*]").unwrap();
    }
    // Character count, not bytes: a multibyte character is one character.
    password.chars().count() >= 8
        && HAS_DIGIT.is_match(password)
        && HAS_LOWER.is_match(password)
        && HAS_UPPER.is_match(password)
        && HAS_SYMBOL.is_match(password)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_accepts_strong_password() {
        assert!(is_strong("Str0ng!Pass"));
        assert!(is_strong("Admin123!"));
    }

    #[test]
    fn policy_rejects_weak_passwords() {
        assert!(!is_strong("Sh0rt!x")); // 7 chars
        assert!(!is_strong("NoDigits!here"));
        assert!(!is_strong("nouppercase1!"));
        assert!(!is_strong("NOLOWERCASE1!"));
        assert!(!is_strong("NoSymbol123"));
    }

    #[test]
    fn policy_length_counts_characters_not_bytes() {
        // 7 characters but 8 bytes: still too short.
        assert!(!is_strong("Pä55w0!"));
        // 8 characters including a multibyte one: long enough.
        assert!(is_strong("Pä55w0!x"));
    }

    #[test]
    fn hash_never_equals_plaintext() {
        let password = "Str0ng!Pass";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("Str0ng!Pass").expect("hashing should succeed");
        assert!(!verify_password("Wr0ng!Pass", &hash).expect("verify should not error"));
    }

    #[test]
    fn salts_are_per_password() {
        let a = hash_password("Str0ng!Pass").expect("hash");
        let b = hash_password("Str0ng!Pass").expect("hash");
        assert_ne!(a, b);
    }
}
