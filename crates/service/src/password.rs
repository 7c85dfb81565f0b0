use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

/// How passwords are kept in the snapshot.
///
/// `Plaintext` stores and compares the raw string, matching the records
/// written by earlier deployments. `Argon2` stores a PHC hash instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    Plaintext,
    Argon2,
}

impl PasswordScheme {
    /// Produce the value to store for `raw`.
    pub fn encode(&self, raw: &str) -> Result<String, ServiceError> {
        match self {
            PasswordScheme::Plaintext => Ok(raw.to_string()),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(raw.as_bytes(), &salt)
                    .map_err(|e| ServiceError::Hash(e.to_string()))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Check `raw` against a stored value. Unparseable hashes never match.
    pub fn verify(&self, raw: &str, stored: &str) -> bool {
        match self {
            PasswordScheme::Plaintext => raw == stored,
            PasswordScheme::Argon2 => match PasswordHash::new(stored) {
                Ok(parsed) => Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok(),
                Err(_) => false,
            },
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordScheme::Plaintext),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(ServiceError::Validation(format!("unknown password scheme `{other}`"))),
        }
    }
}
