//! Password hashing.

use crate::domain::user::Password;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The underlying hash computation failed.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying failure description.
        message: String,
    },
}

/// One-way salted password hasher backed by bcrypt.
///
/// A fresh salt is generated per call, so hashing the same password twice
/// yields different strings. The cost factor is configurable so tests can use
/// the cheapest setting.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Construct a hasher with an explicit bcrypt cost factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Construct a hasher with the library default cost.
    pub fn with_default_cost() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }

    /// Hash a password with a per-call salt.
    pub fn hash(&self, password: &Password) -> Result<String, CredentialError> {
        bcrypt::hash(password.expose(), self.cost).map_err(|error| CredentialError::Hashing {
            message: error.to_string(),
        })
    }

    /// Check a password against a stored hash.
    ///
    /// An unparseable hash counts as a mismatch rather than an error: the
    /// caller cannot do anything smarter than reject the credentials.
    pub fn verify(&self, password: &Password, hash: &str) -> bool {
        bcrypt::verify(password.expose(), hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[test]
    fn hash_verifies_and_salts_per_call() {
        let hasher = PasswordHasher::new(TEST_COST);
        let secret = password("TestPassword123!");

        let first = hasher.hash(&secret).expect("hashing succeeds");
        let second = hasher.hash(&secret).expect("hashing succeeds");

        assert_ne!(first, second, "salt must differ per call");
        assert!(hasher.verify(&secret, &first));
        assert!(hasher.verify(&secret, &second));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash(&password("correct")).expect("hashing succeeds");
        assert!(!hasher.verify(&password("incorrect"), &hash));
    }

    #[test]
    fn verify_rejects_garbage_hashes() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(!hasher.verify(&password("anything"), "not-a-bcrypt-hash"));
    }
}
