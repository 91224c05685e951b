use std::collections::HashSet;
use ammonia::Builder;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use argon2::password_hash::SaltString;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use uuid::Uuid;
use crate::config::AVATAR_BASE_URL;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::PasswordHash;

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn validate_uuid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// Strips every tag (and the contents of `script`/`style`) and HTML-escapes
/// what is left, so the result is safe to drop into markup as text.
pub fn plain_text(text: &str) -> String {
    Builder::default()
        .tags(HashSet::new())
        .clean(text)
        .to_string()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gravatar URL for `email`: MD5 hex digest of the trimmed, lower-cased
/// address, identicon fallback, `size` pixels square.
pub fn avatar_url(email: &str, size: u32) -> String {
    let digest = md5::compute(normalize_email(email).as_bytes());
    format!("{}/{:x}?d=identicon&s={}", AVATAR_BASE_URL, digest, size)
}
