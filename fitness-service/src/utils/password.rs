use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, Secret};

/// Plaintext password. Wrapped so it never shows up in `Debug` output or logs.
#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// The returned PHC string embeds the salt and parameters.
pub fn hash_password(password: &Password) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Check a password against a stored PHC hash.
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash is unreadable.
pub fn verify_password(password: &Password, stored_hash: &str) -> Result<bool, anyhow::Error> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2_phc_string() {
        let hash = hash_password(&Password::new("correct horse battery".to_string()))
            .expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_round_trip() {
        let password = Password::new("correct horse battery".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(verify_password(&password, &hash).unwrap());
        assert!(!verify_password(&Password::new("wrong".to_string()), &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let password = Password::new("same-password".to_string());
        let a = hash_password(&password).unwrap();
        let b = hash_password(&password).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let password = Password::new("anything".to_string());
        assert!(verify_password(&password, "not-a-hash").is_err());
    }

    #[test]
    fn test_debug_does_not_leak() {
        let password = Password::new("hunter2".to_string());
        assert!(!format!("{:?}", password).contains("hunter2"));
    }
}
