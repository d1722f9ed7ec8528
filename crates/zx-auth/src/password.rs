//! Argon2 credential hashing.
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::Error;
use argon2::password_hash::SaltString;

fn salt() -> Result<SaltString, Error> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes)
}

/// One-way hash in PHC string format, salted per call.
pub fn hash(password: &str) -> Result<String, Error> {
    let ref salt = salt()?;
    Argon2::default()
        .hash_password(password.as_bytes(), salt)
        .map(|h| h.to_string())
}

/// A malformed stored hash verifies as false rather than erroring.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .map(|ref parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
